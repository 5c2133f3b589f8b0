//! Keccak hashing (original padding, pre-SHA-3), implemented from scratch.
//!
//! Sponge over `keccak-f[1600]`: 25 lanes of `u64`, rate/capacity split by
//! output width, absorb-then-squeeze. The padding is the original Keccak
//! rule (`0x01` after the message, `0x80` into the last rate byte), not the
//! SHA-3 domain-separated variant; EVM tooling depends on this byte-for-byte.

use crate::types::Digest256;

const KECCAK_ROUNDS: usize = 24;
const STATE_BYTES: usize = 200;

const ROUND_CONSTANTS: [u64; KECCAK_ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

// Rotation offsets and lane destinations for the combined rho/pi walk,
// starting from lane (1, 0).
const RHO_OFFSETS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// The 24-round permutation. Lane `(x, y)` lives at index `x + 5 * y`.
fn keccak_f(lanes: &mut [u64; 25]) {
    for &rc in ROUND_CONSTANTS.iter() {
        // theta: column parities, each lane XORed with D[x] = C[x-1] ^ rotl1(C[x+1])
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = lanes[x] ^ lanes[x + 5] ^ lanes[x + 10] ^ lanes[x + 15] ^ lanes[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                lanes[x + 5 * y] ^= d;
            }
        }

        // rho + pi in one pass over the cycle of 24 non-origin lanes
        let mut carry = lanes[1];
        for i in 0..24 {
            let dst = PI_LANES[i];
            let next = lanes[dst];
            lanes[dst] = carry.rotate_left(RHO_OFFSETS[i]);
            carry = next;
        }

        // chi: the only nonlinear step, row-wise
        for y in 0..5 {
            let row = [
                lanes[5 * y],
                lanes[5 * y + 1],
                lanes[5 * y + 2],
                lanes[5 * y + 3],
                lanes[5 * y + 4],
            ];
            for x in 0..5 {
                lanes[5 * y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        // iota
        lanes[0] ^= rc;
    }
}

/// Incremental Keccak hasher. Input bytes are XORed straight into the state
/// little-endian; the permutation runs whenever a full rate block has been
/// absorbed, so feeding a message in arbitrary chunks matches one-shot use.
#[derive(Clone)]
pub struct Keccak {
    lanes: [u64; 25],
    rate: usize,
    offset: usize,
    output_bytes: usize,
}

impl Keccak {
    fn with_output(output_bytes: usize) -> Self {
        Self {
            lanes: [0u64; 25],
            rate: STATE_BYTES - 2 * output_bytes,
            offset: 0,
            output_bytes,
        }
    }

    pub fn v224() -> Self {
        Self::with_output(28)
    }

    pub fn v256() -> Self {
        Self::with_output(32)
    }

    pub fn v384() -> Self {
        Self::with_output(48)
    }

    pub fn v512() -> Self {
        Self::with_output(64)
    }

    fn xor_byte(&mut self, pos: usize, byte: u8) {
        self.lanes[pos / 8] ^= (byte as u64) << (8 * (pos % 8));
    }

    fn state_byte(&self, pos: usize) -> u8 {
        (self.lanes[pos / 8] >> (8 * (pos % 8))) as u8
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.xor_byte(self.offset, byte);
            self.offset += 1;
            if self.offset == self.rate {
                keccak_f(&mut self.lanes);
                self.offset = 0;
            }
        }
    }

    pub fn finalize(mut self) -> Vec<u8> {
        // Original Keccak padding: 0x01 right after the message, 0x80 into
        // the final rate byte (they coincide when only one byte remains).
        self.xor_byte(self.offset, 0x01);
        self.xor_byte(self.rate - 1, 0x80);
        keccak_f(&mut self.lanes);

        let mut out = Vec::with_capacity(self.output_bytes);
        let mut remaining = self.output_bytes;
        loop {
            let take = remaining.min(self.rate);
            for pos in 0..take {
                out.push(self.state_byte(pos));
            }
            remaining -= take;
            if remaining == 0 {
                return out;
            }
            keccak_f(&mut self.lanes);
        }
    }
}

pub fn keccak256(data: &[u8]) -> Digest256 {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let out = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&out);
    digest
}

pub fn keccak224(data: &[u8]) -> Vec<u8> {
    let mut hasher = Keccak::v224();
    hasher.update(data);
    hasher.finalize()
}

pub fn keccak384(data: &[u8]) -> Vec<u8> {
    let mut hasher = Keccak::v384();
    hasher.update(data);
    hasher.finalize()
}

pub fn keccak512(data: &[u8]) -> Vec<u8> {
    let mut hasher = Keccak::v512();
    hasher.update(data);
    hasher.finalize()
}
