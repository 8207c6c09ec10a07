//! Hash function plugin contract and the registry of benchmarked functions.
//!
//! Every function takes the token bytes plus an optional [`Seed`] and returns
//! exactly one output width. The width is part of the registration
//! ([`HashKind`]), so the runner dispatches once per benchmark instead of once
//! per token, and a function can never claim both widths or neither.
use std::hash::{BuildHasher, Hasher};

use siphasher::sip::SipHasher24;
use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

use crate::error::{BenchError, Result};

/// Opaque per-function parameter. Each function interprets the shape it
/// understands and falls back to its own default otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seed {
    /// Integer initial value or seed.
    Word(u64),
    /// 128-bit key.
    Key([u8; 16]),
}

pub type Hash32Fn = fn(&[u8], Option<&Seed>) -> u32;
pub type Hash64Fn = fn(&[u8], Option<&Seed>) -> u64;

/// The two invocation shapes a hash function can have.
#[derive(Clone, Copy, Debug)]
pub enum HashKind {
    Hash32(Hash32Fn),
    Hash64(Hash64Fn),
}

/// A registered hash function: display name, entry point and seed.
#[derive(Clone, Debug)]
pub struct HashFunction {
    name: &'static str,
    kind: HashKind,
    seed: Option<Seed>,
}

impl HashFunction {
    pub fn hash32(name: &'static str, func: Hash32Fn) -> Self {
        Self {
            name,
            kind: HashKind::Hash32(func),
            seed: None,
        }
    }

    pub fn hash64(name: &'static str, func: Hash64Fn) -> Self {
        Self {
            name,
            kind: HashKind::Hash64(func),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    pub fn bits(&self) -> u32 {
        match self.kind {
            HashKind::Hash32(_) => 32,
            HashKind::Hash64(_) => 64,
        }
    }

    /// Hashes `data` once, widening the output to 64 bits.
    pub fn hash_u64(&self, data: &[u8]) -> u64 {
        match self.kind {
            HashKind::Hash32(func) => u64::from(func(data, self.seed())),
            HashKind::Hash64(func) => func(data, self.seed()),
        }
    }
}

/// Ordered set of hash functions with unique names. Benchmark results are
/// addressed by the same index a function was registered at.
#[derive(Clone, Debug, Default)]
pub struct HashRegistry {
    functions: Vec<HashFunction>,
}

impl HashRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `function` and returns its index. Names are compared
    /// case-insensitively.
    pub fn register(&mut self, function: HashFunction) -> Result<usize> {
        if self.position(function.name()).is_some() {
            return Err(BenchError::DuplicateHash(function.name().to_string()));
        }
        self.functions.push(function);
        Ok(self.functions.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HashFunction> {
        self.functions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashFunction> {
        self.functions.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.functions.iter().map(|f| f.name()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.functions
            .iter()
            .position(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Keeps the functions named in `names` (case-insensitive), in registry
    /// order. Every requested name must exist.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if let Some(missing) = names
            .iter()
            .map(|name| name.as_ref())
            .find(|&name| self.position(name).is_none())
        {
            return Err(BenchError::UnknownHash(missing.to_string()));
        }
        let functions = self
            .functions
            .iter()
            .filter(|f| {
                names
                    .iter()
                    .any(|name| f.name().eq_ignore_ascii_case(name.as_ref()))
            })
            .cloned()
            .collect();
        Ok(Self { functions })
    }

    /// The six functions of the classic dictionary benchmark.
    pub fn classic() -> Self {
        Self {
            functions: vec![
                HashFunction::hash32("murmur3_32", murmur3_32)
                    .with_seed(Seed::Word(0x9747_b28c)),
                HashFunction::hash32("djb2", djb2),
                HashFunction::hash32("jenkins", jenkins_oaat),
                HashFunction::hash32("fnv1a_32", fnv1a_32),
                HashFunction::hash32("crc32c", crc32c),
                HashFunction::hash64("siphash64", siphash64)
                    .with_seed(Seed::Key(*b"randomsecretkey!")),
            ],
        }
    }

    /// Classic functions followed by the crate-backed ones.
    pub fn builtin() -> Self {
        let mut registry = Self::classic();
        registry.functions.extend([
            HashFunction::hash32("crc32", crc32),
            HashFunction::hash32("adler32", adler32),
            HashFunction::hash64("fnv1a_64", fnv1a_64),
            HashFunction::hash64("fxhash64", fxhash64),
            HashFunction::hash64("xxh3_64", xxh3),
            HashFunction::hash64("ahash", ahash64).with_seed(Seed::Word(42)),
            HashFunction::hash64("foldhash", foldhash64).with_seed(Seed::Word(42)),
            HashFunction::hash64("seahash", seahash64),
        ]);
        registry
    }
}

fn word32(seed: Option<&Seed>, default: u32) -> u32 {
    match seed {
        Some(Seed::Word(word)) => *word as u32,
        _ => default,
    }
}

fn word64(seed: Option<&Seed>) -> Option<u64> {
    match seed {
        Some(Seed::Word(word)) => Some(*word),
        _ => None,
    }
}

/// MurmurHash3 x86_32, little-endian block reads.
pub fn murmur3_32(data: &[u8], seed: Option<&Seed>) -> u32 {
    #[inline(always)]
    fn scramble(k: u32) -> u32 {
        k.wrapping_mul(0xcc9e_2d51)
            .rotate_left(15)
            .wrapping_mul(0x1b87_3593)
    }

    let mut hash = word32(seed, 0);
    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        hash ^= scramble(k);
        hash = hash.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let k = tail
            .iter()
            .rev()
            .fold(0u32, |k, &byte| (k << 8) | u32::from(byte));
        hash ^= scramble(k);
    }

    hash ^= data.len() as u32;
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^ (hash >> 16)
}

/// Bernstein's `hash * 33 + byte`.
pub fn djb2(data: &[u8], seed: Option<&Seed>) -> u32 {
    data.iter().fold(word32(seed, 5381), |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u32::from(byte))
    })
}

/// Bob Jenkins' one-at-a-time hash.
pub fn jenkins_oaat(data: &[u8], seed: Option<&Seed>) -> u32 {
    let mut hash = word32(seed, 0);
    for &byte in data {
        hash = hash.wrapping_add(u32::from(byte));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

const FNV_BASIS_32: u32 = 0x811c_9dc5;
const FNV_PRIME_32: u32 = 0x0100_0193;

pub fn fnv1a_32(data: &[u8], seed: Option<&Seed>) -> u32 {
    data.iter().fold(word32(seed, FNV_BASIS_32), |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME_32)
    })
}

const CRC32C_POLY: u32 = 0x82f6_3b78;

const CRC32C_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32C_POLY
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Raw CRC-32C register update (no pre/post inversion), matching the SSE4.2
/// `crc32` instruction chain.
pub fn crc32c(data: &[u8], seed: Option<&Seed>) -> u32 {
    data.iter().fold(word32(seed, 0), |crc, &byte| {
        CRC32C_TABLE[((crc ^ u32::from(byte)) & 0xff) as usize] ^ (crc >> 8)
    })
}

/// SipHash-2-4 keyed with a 128-bit [`Seed::Key`] (all-zero key otherwise).
pub fn siphash64(data: &[u8], seed: Option<&Seed>) -> u64 {
    let key = match seed {
        Some(Seed::Key(key)) => *key,
        _ => [0u8; 16],
    };
    let mut hasher = SipHasher24::new_with_key(&key);
    hasher.write(data);
    hasher.finish()
}

fn crc32(data: &[u8], seed: Option<&Seed>) -> u32 {
    match word64(seed) {
        Some(initial) => {
            let mut hasher = crc32fast::Hasher::new_with_initial(initial as u32);
            hasher.update(data);
            hasher.finalize()
        }
        None => crc32fast::hash(data),
    }
}

fn adler32(data: &[u8], _seed: Option<&Seed>) -> u32 {
    adler::adler32_slice(data)
}

fn fnv1a_64(data: &[u8], seed: Option<&Seed>) -> u64 {
    let mut hasher = match word64(seed) {
        Some(key) => fnv::FnvHasher::with_key(key),
        None => fnv::FnvHasher::default(),
    };
    hasher.write(data);
    hasher.finish()
}

fn fxhash64(data: &[u8], _seed: Option<&Seed>) -> u64 {
    fxhash::hash64(data)
}

fn xxh3(data: &[u8], seed: Option<&Seed>) -> u64 {
    match word64(seed) {
        Some(seed) => xxh3_64_with_seed(data, seed),
        None => xxh3_64(data),
    }
}

fn ahash64(data: &[u8], seed: Option<&Seed>) -> u64 {
    let seed = word64(seed).unwrap_or(0);
    // Fixed seeds keep the output identical across processes.
    ahash::RandomState::with_seeds(
        seed,
        seed ^ 0x243f_6a88_85a3_08d3,
        seed ^ 0x1319_8a2e_0370_7344,
        seed ^ 0xa409_3822_299f_31d0,
    )
    .hash_one(data)
}

fn foldhash64(data: &[u8], seed: Option<&Seed>) -> u64 {
    foldhash::fast::FixedState::with_seed(word64(seed).unwrap_or(0)).hash_one(data)
}

fn seahash64(data: &[u8], _seed: Option<&Seed>) -> u64 {
    seahash::hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let registry = HashRegistry::builtin();
        let mut names: Vec<String> = registry
            .names()
            .iter()
            .map(|n| n.to_lowercase())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn classic_order_and_widths() {
        let registry = HashRegistry::classic();
        assert_eq!(
            registry.names(),
            ["murmur3_32", "djb2", "jenkins", "fnv1a_32", "crc32c", "siphash64"]
        );
        let bits: Vec<u32> = registry.iter().map(HashFunction::bits).collect();
        assert_eq!(bits, [32, 32, 32, 32, 32, 64]);
    }

    #[test]
    fn register_rejects_duplicate_names() {
        let mut registry = HashRegistry::new();
        assert_eq!(registry.register(HashFunction::hash32("djb2", djb2)).unwrap(), 0);
        let err = registry
            .register(HashFunction::hash32("DJB2", fnv1a_32))
            .unwrap_err();
        assert!(matches!(err, BenchError::DuplicateHash(name) if name == "DJB2"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn select_keeps_registry_order() {
        let registry = HashRegistry::builtin();
        let selected = registry.select(&["XXH3_64", "djb2"]).unwrap();
        assert_eq!(selected.names(), ["djb2", "xxh3_64"]);
    }

    #[test]
    fn select_reports_unknown_name() {
        let err = HashRegistry::classic().select(&["nope"]).unwrap_err();
        assert!(matches!(err, BenchError::UnknownHash(name) if name == "nope"));
    }

    #[test]
    fn known_vectors() {
        // Published test vectors.
        assert_eq!(fnv1a_32(b"", None), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a", None), 0xe40c_292c);
        assert_eq!(djb2(b"", None), 5381);
        assert_eq!(djb2(b"a", None), 5381 * 33 + 97);
        assert_eq!(murmur3_32(b"", Some(&Seed::Word(0))), 0);
        assert_eq!(murmur3_32(b"", Some(&Seed::Word(1))), 0x514e_28b7);
        assert_eq!(murmur3_32(b"test", Some(&Seed::Word(0x9747_b28c))), 0x704b_81dc);
        assert_eq!(jenkins_oaat(b"a", None), 0xca2e_9442);
        // Raw CRC-32C register of "123456789" with inverted init/output is the check value.
        let crc = !crc32c(b"123456789", Some(&Seed::Word(u64::from(u32::MAX))));
        assert_eq!(crc, 0xe306_9283);
    }

    #[test]
    fn seed_changes_output() {
        let data = b"hello";
        assert_ne!(djb2(data, None), djb2(data, Some(&Seed::Word(7))));
        assert_ne!(
            siphash64(data, None),
            siphash64(data, Some(&Seed::Key(*b"randomsecretkey!")))
        );
        // Shapes a function does not understand fall back to its default.
        assert_eq!(djb2(data, None), djb2(data, Some(&Seed::Key([1; 16]))));
    }

    #[test]
    fn widening_preserves_32_bit_output() {
        let function = HashFunction::hash32("fnv1a_32", fnv1a_32);
        assert_eq!(function.hash_u64(b"a"), 0xe40c_292c);
        assert_eq!(function.bits(), 32);
    }

    #[test]
    fn builtin_functions_are_deterministic() {
        for function in HashRegistry::builtin().iter() {
            assert_eq!(
                function.hash_u64(b"determinism"),
                function.hash_u64(b"determinism"),
                "{}",
                function.name()
            );
        }
    }
}
