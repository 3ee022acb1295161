//! A thread-based multiplexer carrying many logical channels over one
//! two-party connection.
//!
//! Each frame on the wire is `channel_id (1 byte) || length (8 bytes,
//! little-endian) || payload`. Channel ids `0..=254` carry payloads; id 255
//! is reserved for the session teardown signal, which carries an empty
//! payload. Within one logical channel, frames arrive in FIFO order; across
//! channels there is no ordering guarantee.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use crypto_core::AbstractChannel;
use tracing::debug;

/// The reserved channel id signalling the end of a session.
pub const ADMIN_CHANNEL: u8 = 255;

#[derive(Debug, thiserror::Error)]
pub enum MuxError {
    #[error("mux io error")]
    IoError(#[from] io::Error),
    #[error("invalid number of mux channels: {0}")]
    InvalidChannelCount(usize),
    #[error("mux channel id {0} out of range")]
    InvalidChannelId(u8),
    #[error("mux session closed")]
    SessionClosed,
    #[error("mux thread panicked")]
    ThreadPanic,
}

struct SendTask {
    channel_id: u8,
    payload: Vec<u8>,
}

/// A multiplexer over a clonable channel. `start` brackets one session:
/// both parties start a session, exchange frames, and shut it down, so
/// back-to-back sessions on one connection never steal each other's frames.
pub struct ChannelMux<C> {
    channel: C,
    num_channels: usize,
}

impl<C: AbstractChannel + Clone + Send + 'static> ChannelMux<C> {
    pub fn new(channel: C, num_channels: usize) -> Result<Self, MuxError> {
        if num_channels == 0 || num_channels > ADMIN_CHANNEL as usize {
            return Err(MuxError::InvalidChannelCount(num_channels));
        }
        Ok(Self {
            channel,
            num_channels,
        })
    }

    /// Spawn the send and receive threads for one session.
    pub fn start(&self) -> MuxSession {
        let (task_tx, task_rx) = unbounded::<SendTask>();
        let mut queue_txs = Vec::with_capacity(self.num_channels);
        let mut queue_rxs = Vec::with_capacity(self.num_channels);
        for _ in 0..self.num_channels {
            let (tx, rx) = unbounded::<Vec<u8>>();
            queue_txs.push(tx);
            queue_rxs.push(rx);
        }

        debug!(num_channels = self.num_channels, "mux session start");

        let mut send_channel = self.channel.clone();
        let sender = thread::spawn(move || -> io::Result<()> {
            for task in task_rx.iter() {
                let mut frame = Vec::with_capacity(9 + task.payload.len());
                frame.push(task.channel_id);
                frame.extend_from_slice(&(task.payload.len() as u64).to_le_bytes());
                frame.extend_from_slice(&task.payload);
                send_channel.write_bytes(&frame)?;
                send_channel.flush()?;
                if task.channel_id == ADMIN_CHANNEL {
                    break;
                }
            }
            Ok(())
        });

        let mut recv_channel = self.channel.clone();
        let receiver = thread::spawn(move || -> io::Result<()> {
            loop {
                let mut header = [0u8; 9];
                recv_channel.read_bytes(&mut header)?;
                let channel_id = header[0];
                let mut len = [0u8; 8];
                len.copy_from_slice(&header[1..]);
                let len = u64::from_le_bytes(len) as usize;
                if channel_id == ADMIN_CHANNEL {
                    break Ok(());
                }
                if channel_id as usize >= queue_txs.len() {
                    break Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("unexpected mux channel id {channel_id}"),
                    ));
                }
                let mut payload = vec![0u8; len];
                recv_channel.read_bytes(&mut payload)?;
                if queue_txs[channel_id as usize].send(payload).is_err() {
                    break Ok(());
                }
            }
        });

        MuxSession {
            tasks: task_tx,
            queues: queue_rxs,
            sender,
            receiver,
        }
    }
}

/// One running mux session. Dropping it without `shutdown` leaks the
/// threads until the peer ends the session.
pub struct MuxSession {
    tasks: Sender<SendTask>,
    queues: Vec<Receiver<Vec<u8>>>,
    sender: JoinHandle<io::Result<()>>,
    receiver: JoinHandle<io::Result<()>>,
}

impl MuxSession {
    /// Enqueue `payload` on the logical channel `channel_id`.
    pub fn send(&self, channel_id: u8, payload: Vec<u8>) -> Result<(), MuxError> {
        if channel_id as usize >= self.queues.len() {
            return Err(MuxError::InvalidChannelId(channel_id));
        }
        self.tasks
            .send(SendTask {
                channel_id,
                payload,
            })
            .map_err(|_| MuxError::SessionClosed)
    }

    /// Block until the next payload on `channel_id` arrives.
    pub fn recv(&self, channel_id: u8) -> Result<Vec<u8>, MuxError> {
        if channel_id as usize >= self.queues.len() {
            return Err(MuxError::InvalidChannelId(channel_id));
        }
        self.queues[channel_id as usize]
            .recv()
            .map_err(|_| MuxError::SessionClosed)
    }

    /// Signal the end of the session and join both threads. Blocks until
    /// the peer has signalled its end as well.
    pub fn shutdown(self) -> Result<(), MuxError> {
        self.tasks
            .send(SendTask {
                channel_id: ADMIN_CHANNEL,
                payload: Vec::new(),
            })
            .map_err(|_| MuxError::SessionClosed)?;
        self.sender.join().map_err(|_| MuxError::ThreadPanic)??;
        self.receiver.join().map_err(|_| MuxError::ThreadPanic)??;
        debug!("mux session shutdown");
        Ok(())
    }
}
