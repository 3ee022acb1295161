//! Two-party 32-bit addition over TCP.
//!
//! Run the generator in one terminal and the evaluator in another:
//!
//! ```text
//! cargo run --example pqyao -- --is-server 1
//! cargo run --example pqyao -- --is-server 0
//! ```
//!
//! The generator holds 16807, the evaluator 282475249; both learn the sum.

use circuit::Circuit;
use crypto_core::{CommandLineOpt, NetChannel};
use structopt::StructOpt;
use twopc::{compute, setup_evaluator, setup_generator, Party, ProtocolExecutor};

const OT_THREADS: usize = 4;
const PLAIN_MODULUS_BITLEN: usize = 17;

fn to_bits(x: u64, n: usize) -> Vec<bool> {
    (0..n).map(|i| (x >> i) & 1 == 1).collect()
}

fn from_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .map(|(i, b)| (*b as u64) << i)
        .sum()
}

fn main() {
    tracing_subscriber::fmt::init();
    let opt = CommandLineOpt::from_args();
    let is_server = opt.is_server == 1;

    let circ = Circuit::load("circuit/circuit_files/bristol/adder_32bit.txt").unwrap();
    let channel = NetChannel::new(is_server, &opt.addr[..]);

    let result = if is_server {
        let input = 16807u64;
        let (mut gc, mut exec) =
            setup_generator(channel.clone(), circ.neva_wires, OT_THREADS, PLAIN_MODULUS_BITLEN)
                .unwrap();
        let a = exec
            .feed(Party::Generator, &to_bits(input, circ.ngen_wires))
            .unwrap();
        let b = exec
            .feed(Party::Evaluator, &vec![false; circ.neva_wires])
            .unwrap();
        exec.do_batched_ot().unwrap();

        let a_wires = exec.wires(a).unwrap().to_vec();
        let b_wires = exec.wires(b).unwrap().to_vec();
        let out = compute(&mut gc, &circ, &a_wires, &b_wires).unwrap();
        from_bits(&exec.reveal(Party::Public, &out).unwrap())
    } else {
        let input = 282475249u64;
        let (mut gc, mut exec) =
            setup_evaluator(channel.clone(), circ.neva_wires, OT_THREADS, PLAIN_MODULUS_BITLEN)
                .unwrap();
        let a = exec
            .feed(Party::Generator, &vec![false; circ.ngen_wires])
            .unwrap();
        let b = exec
            .feed(Party::Evaluator, &to_bits(input, circ.neva_wires))
            .unwrap();
        exec.do_batched_ot().unwrap();

        let a_wires = exec.wires(a).unwrap().to_vec();
        let b_wires = exec.wires(b).unwrap().to_vec();
        let out = compute(&mut gc, &circ, &a_wires, &b_wires).unwrap();
        from_bits(&exec.reveal(Party::Public, &out).unwrap())
    };

    println!("result: {result}");
    println!(
        "sent {} bytes, received {} bytes",
        channel.write_count(),
        channel.read_count()
    );
}
