/// Maximum length (in characters) of the import root path
pub const MAX_ROOT_LEN: usize = 80;

/// Width of one hashed path segment (32-bit hash as lowercase hex)
pub const HASH_HEX_WIDTH: usize = 8;

/// Legacy control files recognized by exact base name
pub const OTO_FILE: &str = "oto.ini";
pub const CHARACTER_FILE: &str = "character.txt";
pub const PREFIX_MAP_FILE: &str = "prefix.map";

/// Normalized record files written next to the hashed directory
pub const OTO_RECORD: &str = "_oto.json";
pub const VOICEBANK_RECORD: &str = "_voicebank.json";
pub const PREFIX_MAP_RECORD: &str = "_prefix_map.json";

/// Copied unchanged, keeping their base name (matched case-insensitively)
pub const VERBATIM_SUFFIXES: &[&str] = &[".bmp", ".gif", ".jpg", ".jpeg", ".png"];

/// Copied under a fully hashed path with the suffix reattached.
/// `_wav.frq` must stay ahead of anything it could shadow.
pub const HASHED_SUFFIXES: &[&str] = &["_wav.frq", ".wav"];

/// Progress is reported on a 0..=PROGRESS_SCALE integer scale
pub const PROGRESS_SCALE: u32 = 100;
