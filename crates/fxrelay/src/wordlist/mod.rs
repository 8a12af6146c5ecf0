//! Word list module for generating human-readable peer handles
//! Format: adjective-noun (e.g., "amber-falcon", "quiet-heron")

use uuid::Uuid;

/// Adjectives for handle generation
const ADJECTIVES: &[&str] = &[
    "amber", "ashen", "bold", "brave", "brisk", "calm", "civil", "clear", "crisp", "deft",
    "dusky", "eager", "early", "faint", "fleet", "frosty", "gentle", "gilded", "glossy", "grand",
    "hardy", "hasty", "humble", "ivory", "jolly", "keen", "lively", "lucid", "mellow", "merry",
    "misty", "noble", "opal", "pale", "placid", "plucky", "proud", "quiet", "rapid", "royal",
    "rustic", "sable", "sage", "sharp", "silent", "sleek", "solemn", "stark", "stout", "sunny",
    "swift", "tidy", "vivid", "witty",
];

/// Nouns for handle generation
const NOUNS: &[&str] = &[
    "aspen", "badger", "beacon", "birch", "bison", "breeze", "brook", "canyon", "cedar", "comet",
    "condor", "coral", "crane", "creek", "delta", "dune", "eagle", "ember", "falcon", "fern",
    "finch", "fjord", "gale", "grove", "harbor", "hawk", "heron", "hollow", "ibis", "inlet",
    "jackal", "kestrel", "lagoon", "lark", "lynx", "maple", "marmot", "meadow", "mesa", "moth",
    "nettle", "oriole", "osprey", "otter", "peak", "pebble", "pine", "plume", "prairie", "quartz",
    "raven", "reef", "ridge", "river", "sparrow", "spruce", "summit", "swan", "tern", "thistle",
    "tundra", "vole", "walnut", "willow", "wren", "zephyr",
];

/// Simple hash over raw bytes, folding each byte into the accumulator.
fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hash: i32 = 0;
    for byte in bytes {
        hash = ((hash << 5).wrapping_sub(hash)).wrapping_add(*byte as i32);
    }
    hash.unsigned_abs()
}

/// Generate a deterministic human-readable handle for a peer ID.
///
/// The same ID always maps to the same handle; distinct IDs map to distinct
/// handles with high probability. Handles are for display only and carry no
/// uniqueness guarantee.
pub fn display_name(id: &Uuid) -> String {
    let hash = hash_bytes(id.as_bytes());
    let adj_idx = (hash as usize) % ADJECTIVES.len();
    let noun_idx = ((hash as usize) / ADJECTIVES.len()) % NOUNS.len();
    format!("{}-{}", ADJECTIVES[adj_idx], NOUNS[noun_idx])
}
