//! Constants for defaults, search parameters, and heuristic weights.
//!
//! Everything tunable about the brain lives here so that the protocol layer,
//! the board and the solver agree on a single set of numbers.

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Board width and height used until the manager sends `START`/`RECTSTART`.
pub const DEFAULT_BOARD_SIZE: u32 = 20;

/// Smallest board on which five-in-a-row can be played.
pub const MIN_BOARD_SIZE: usize = 5;

/// Default per-turn time limit, in milliseconds.
pub const DEFAULT_TIMEOUT_TURN: u32 = 5 * 1000;

/// Default per-match time limit, in milliseconds.
pub const DEFAULT_TIMEOUT_MATCH: u32 = 180 * 1000;

/// Default memory ceiling, in bytes.
pub const DEFAULT_MAX_MEMORY: u32 = 70 * 1024 * 1024;

/// Default remaining match time, in milliseconds.
pub const DEFAULT_TIME_LEFT: u32 = 180 * 1000;

// =============================================================================
// Search Parameters
// =============================================================================

/// Number of plies explored below each root candidate.
pub const DEPTH_LIMIT: u32 = 2;

/// Candidates farther than this from the stones' bounding box are skipped.
pub const AWAY_LIMIT: usize = 3;

/// Forced win/block detection only kicks in once this many stones are down.
pub const FORCED_MOVE_THRESHOLD: usize = 7;

/// The solver never plans with less than this much time per turn (ms).
pub const MIN_TURN_TIME: u32 = 100;

/// Time reserved before the manager's hard deadline (ms).
pub const TIMEOUT_MARGIN: u32 = 50;

/// Evaluation cache capacity when memory is not a constraint.
pub const CACHE_CAPACITY: usize = 500_000;

/// Rough footprint of one cache entry, hash map overhead included.
pub const CACHE_ENTRY_BYTES: usize = 32;

/// Score of a position the side to move has already won.
pub const WIN_SCORE: i64 = i64::MAX - 1;

/// Score of a position the side to move can no longer save.
pub const LOSS_SCORE: i64 = i64::MIN + 1;

// =============================================================================
// Heuristic Weights
// =============================================================================

/// Length of the scanning window (and of a winning line).
pub const WINDOW: usize = 5;

/// Number of distinct five-cell windows (3 states per cell).
pub const WINDOW_PATTERNS: usize = 243;

/// Base value of an otherwise-empty window, by number of own stones.
///
/// Each step is more than ten times the previous one plus its largest run
/// bonus, so one extra stone always outweighs a better arrangement.
pub const STONE_WEIGHTS: [i64; WINDOW + 1] = [0, 1, 10, 100, 1_000, 1_000_000_000];

/// Bonus for the longest unbroken run inside the window, by run length.
pub const RUN_BONUS: [i64; WINDOW + 1] = [0, 0, 5, 50, 500, 0];

// =============================================================================
// Identity
// =============================================================================

/// Author reported in `ABOUT` responses.
pub const ABOUT_AUTHOR: &str = "gomoku-brain developers";

/// Country reported in `ABOUT` responses.
pub const ABOUT_COUNTRY: &str = "FR";

/// Homepage reported in `ABOUT` responses.
pub const ABOUT_WWW: &str = "https://gomocup.org";

/// Shown when the brain is started from a terminal instead of by a manager.
pub const STARTED_DIRECTLY: &str = "Gomoku brains are not meant to be started directly. \
    Install a Gomocup manager such as Piskvork and add this executable as a player.";
