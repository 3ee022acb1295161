use std::io::{BufReader, BufWriter, Read, Result, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use structopt::StructOpt;

use crate::{AbstractChannel, StdChannel};

/// A TCP channel between the two parties.
pub struct NetChannel<R: Read, W: Write> {
    is_server: bool,
    channel: StdChannel<BufReader<R>, BufWriter<W>>,
}

impl<R: Read, W: Write> Clone for NetChannel<R, W> {
    fn clone(&self) -> Self {
        Self {
            is_server: self.is_server,
            channel: self.channel.clone(),
        }
    }
}

impl NetChannel<TcpStream, TcpStream> {
    /// Connect the two parties. The server binds and waits for the client,
    /// the client retries until the server is up.
    pub fn new<A: ToSocketAddrs + Clone>(is_server: bool, addr: A) -> Self {
        let socket = if is_server {
            let listener = TcpListener::bind(addr).unwrap();
            match listener.accept() {
                Ok((socket, _)) => socket,
                Err(e) => {
                    panic!("could not get client: {e:?}");
                }
            }
        } else {
            loop {
                match TcpStream::connect(addr.clone()) {
                    Ok(socket) => break socket,
                    Err(_) => thread::sleep(Duration::from_millis(1)),
                }
            }
        };
        println!("connected");
        socket.set_nodelay(true).unwrap();
        Self {
            is_server,
            channel: StdChannel::new(
                BufReader::new(socket.try_clone().unwrap()),
                BufWriter::new(socket),
            ),
        }
    }

    pub fn is_server(&self) -> bool {
        self.is_server
    }

    pub fn write_count(&self) -> usize {
        self.channel.write_count()
    }

    pub fn read_count(&self) -> usize {
        self.channel.read_count()
    }
}

impl<R: Read, W: Write> AbstractChannel for NetChannel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.channel.write_bytes(bytes)
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.channel.read_bytes(bytes)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        self.channel.flush()
    }
}

#[derive(StructOpt, Debug)]
pub struct CommandLineOpt {
    #[structopt(short, long, default_value = "-1")]
    pub is_server: u32,

    /// Address to listen on (server) or connect to (client).
    #[structopt(short, long, default_value = "127.0.0.1:12345")]
    pub addr: String,
}
