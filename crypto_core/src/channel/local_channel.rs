use std::{
    io::{BufReader, BufWriter},
    os::unix::net::UnixStream,
};

use crate::StdChannel;

pub type LocalChannel = StdChannel<BufReader<UnixStream>, BufWriter<UnixStream>>;

pub fn local_channel_pair() -> (LocalChannel, LocalChannel) {
    let (tx, rx) = UnixStream::pair().unwrap();
    let sender = StdChannel::new(BufReader::new(tx.try_clone().unwrap()), BufWriter::new(tx));
    let receiver = StdChannel::new(BufReader::new(rx.try_clone().unwrap()), BufWriter::new(rx));
    (sender, receiver)
}
