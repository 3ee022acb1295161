//! I/O channels between the two parties.

pub mod local_channel;
pub mod net_channel;

pub use local_channel::{local_channel_pair, LocalChannel};
pub use net_channel::{CommandLineOpt, NetChannel};

use std::{
    io::{Error, ErrorKind, Read, Result, Write},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use crate::{Block, Label};

/// A trait for I/O channel.
pub trait AbstractChannel {
    /// Write bytes slice to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Read bytes slice from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;

    /// Write a `bool` to the channel.
    #[inline(always)]
    fn write_bool(&mut self, b: bool) -> Result<()> {
        self.write_bytes(&[b as u8])
    }

    /// Read a `bool` from the channel.
    #[inline(always)]
    fn read_bool(&mut self) -> Result<bool> {
        let mut data = [0u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0] != 0)
    }

    /// Write a slice of `bool`s to the channel.
    #[inline(always)]
    fn write_bools(&mut self, bs: &[bool]) -> Result<()> {
        for b in bs.iter() {
            self.write_bool(*b)?;
        }
        Ok(())
    }

    /// Read a vec of `bool`s from the channel.
    #[inline(always)]
    fn read_bools(&mut self, n: usize) -> Result<Vec<bool>> {
        (0..n).map(|_| self.read_bool()).collect()
    }

    /// Write a `Block` to the channel.
    #[inline(always)]
    fn write_block(&mut self, blk: &Block) -> Result<()> {
        self.write_bytes(&blk.to_le_bytes())
    }

    /// Read a `Block` from the channel.
    #[inline(always)]
    fn read_block(&mut self) -> Result<Block> {
        let mut data = [0u8; 16];
        self.read_bytes(&mut data)?;
        Ok(Block::from_le_bytes(data))
    }

    /// Write a `Label` to the channel.
    #[inline(always)]
    fn write_label(&mut self, label: &Label) -> Result<()> {
        self.write_bytes(&label.to_bytes())
    }

    /// Read a `Label` from the channel.
    #[inline(always)]
    fn read_label(&mut self) -> Result<Label> {
        let mut data = [0u8; 32];
        self.read_bytes(&mut data)?;
        Ok(Label::from_bytes(&data))
    }
}

/// A standard channel over any reader/writer pair.
///
/// Clones share the underlying reader and writer, so a clone can be handed
/// to another thread while the original keeps the byte counters.
pub struct StdChannel<R, W> {
    reader: Arc<Mutex<R>>,
    writer: Arc<Mutex<W>>,
    nread: Arc<AtomicUsize>,
    nwrite: Arc<AtomicUsize>,
}

impl<R, W> Clone for StdChannel<R, W> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
            nread: self.nread.clone(),
            nwrite: self.nwrite.clone(),
        }
    }
}

impl<R: Read, W: Write> StdChannel<R, W> {
    /// New a `StdChannel`
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
            nread: Arc::new(AtomicUsize::new(0)),
            nwrite: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total bytes written, over all clones.
    pub fn write_count(&self) -> usize {
        self.nwrite.load(Ordering::Relaxed)
    }

    /// Total bytes read, over all clones.
    pub fn read_count(&self) -> usize {
        self.nread.load(Ordering::Relaxed)
    }
}

impl<R: Read, W: Write> AbstractChannel for StdChannel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "channel writer lock poisoned"))?;
        writer.write_all(bytes)?;
        self.nwrite.fetch_add(bytes.len(), Ordering::Relaxed);
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "channel reader lock poisoned"))?;
        reader.read_exact(bytes)?;
        self.nread.fetch_add(bytes.len(), Ordering::Relaxed);
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "channel writer lock poisoned"))?;
        writer.flush()
    }
}
