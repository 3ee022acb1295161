//! Garbling and evaluation of a single gate.
//!
//! A garbled table has four entries. Entry `(sa ^ i) * 2 + (sb ^ j)` holds
//! the encryption of the output label of truth-table cell `(i, j)` under the
//! input labels `(A_i, B_j)`, where `sa`, `sb` are the color bits of the
//! zero labels. The evaluator then decrypts the entry addressed by the color
//! bits of its two live labels.

use crypto_core::{Block, Label, LabelCipher};
use rand::{CryptoRng, Rng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateKind {
    And,
    Xor,
}

impl GateKind {
    #[inline]
    fn truth(&self, i: bool, j: bool) -> bool {
        match self {
            GateKind::And => i && j,
            GateKind::Xor => i != j,
        }
    }
}

/// The generator's view of a wire: both labels of the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelPair {
    pub zero: Label,
    pub one: Label,
}

impl LabelPair {
    /// Sample a fresh pair. The two color bits always differ.
    pub fn random<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        let zero = rng.gen::<Label>();
        let mut one = rng.gen::<Label>();
        one.set_color(!zero.color());
        LabelPair { zero, one }
    }

    #[inline]
    pub fn select(&self, b: bool) -> Label {
        if b {
            self.one
        } else {
            self.zero
        }
    }
}

#[inline]
fn tweak(gid: usize, entry: usize, k: usize) -> Block {
    Block::from(((gid as u128) << 64) | ((entry << 2 | k) as u128))
}

/// Tweakable double-key encryption of `target` under labels `a` and `b`.
/// XOR-based, so it is its own inverse.
pub fn encrypt_label(a: &Label, b: &Label, gid: usize, entry: usize, target: &Label) -> Label {
    let ca = LabelCipher::new(a);
    let cb = LabelCipher::new(b);
    let lo = ca.encrypt_block(tweak(gid, entry, 0))
        ^ cb.encrypt_block(tweak(gid, entry, 2))
        ^ target.lo;
    let hi = ca.encrypt_block(tweak(gid, entry, 1))
        ^ cb.encrypt_block(tweak(gid, entry, 3))
        ^ target.hi;
    Label { hi, lo }
}

/// Garble one gate: sample the output pair and fill the four table entries.
pub fn garble_gen_gate<R: Rng + CryptoRng>(
    rng: &mut R,
    a: &LabelPair,
    b: &LabelPair,
    gid: usize,
    kind: GateKind,
) -> (LabelPair, [Label; 4]) {
    let out = LabelPair::random(rng);
    let sa = a.zero.color();
    let sb = b.zero.color();

    let mut table = [Label::zero(); 4];
    for i in [false, true] {
        for j in [false, true] {
            let target = out.select(kind.truth(i, j));
            let entry = ((sa != i) as usize) * 2 + ((sb != j) as usize);
            table[entry] = encrypt_label(&a.select(i), &b.select(j), gid, entry, &target);
        }
    }
    (out, table)
}

/// Decrypt the table entry addressed by the color bits of the live labels.
pub fn garble_eval_gate(a: &Label, b: &Label, gid: usize, table: &[Label; 4]) -> Label {
    let entry = (a.color() as usize) * 2 + (b.color() as usize);
    encrypt_label(a, b, gid, entry, &table[entry])
}
