//! Constants for the SMILES tokenizer.

/// SMILES atom-level tokenization regex pattern
/// Matches, in priority order:
/// - Bracketed atoms: [C@@H], [nH], [O-], etc.
/// - Two-char halogens: Br, Cl (must come before B, C)
/// - Single-char elements: B, C, N, O, S, P, F, I
/// - Aromatic atoms: b, c, n, o, s, p
/// - Branches, bonds, stereochemistry and other structural symbols
/// - Ring numbers: %XX or a single digit
///
/// Anything else is skipped by the splitter.
pub const SMILES_ATOM_PATTERN: &str = r"(\[[^\]]+]|Br?|Cl?|N|O|S|P|F|I|b|c|n|o|s|p|\(|\)|\.|=|#|-|\+|\\|\/|:|~|@|\?|>|\*|\$|\%[0-9]{2}|[0-9])";

/// Fixed-width control tag such as `<bos>` or `<sep>`.
pub const CONTROL_TAG_PATTERN: &str = r"<\w{3}>";

/// Signed digit or decimal point, used by the numeric tokenizer.
pub const NUMERIC_PATTERN: &str = r"([+-]?\d|\.)";

/// Special tokens for sequence modeling
pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";
pub const BOS_TOKEN: &str = "<bos>";
pub const EOS_TOKEN: &str = "<eos>";
pub const SEP_TOKEN: &str = "<sep>";
pub const CLS_TOKEN: &str = "<cls>";

/// Reserved tokens in id order. Always registered at IDs 0-5.
pub const RESERVED_TOKENS: [&str; 6] = [
    PAD_TOKEN, UNK_TOKEN, BOS_TOKEN, EOS_TOKEN, SEP_TOKEN, CLS_TOKEN,
];

/// Number of reserved tokens (always at IDs 0-5)
pub const NUM_RESERVED_TOKENS: usize = RESERVED_TOKENS.len();

pub const PAD_TOKEN_ID: u32 = 0;
pub const UNK_TOKEN_ID: u32 = 1;
pub const BOS_TOKEN_ID: u32 = 2;
pub const EOS_TOKEN_ID: u32 = 3;
pub const SEP_TOKEN_ID: u32 = 4;
pub const CLS_TOKEN_ID: u32 = 5;

/// Default maximum vocabulary size
pub const DEFAULT_CAPACITY: usize = 512;

/// Merge table limit meaning "use every line of the codes file"
pub const ALL_MERGES: i64 = -1;

/// Dropout that skips every merge, leaving atom-level tokens.
///
/// Default of the Python `MoltxTokenizer` constructors.
pub const ATOMIC_DROPOUT: f64 = 1.0;
