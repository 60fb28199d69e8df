//! Casino domain types.
//!
//! Defines the game identifiers, session state, and settlement records shared
//! by the outcome engine and its collaborators (wallet, history, web layer).
//! All wire encoding is length-checked binary via `commonware-codec`.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use std::fmt;
use std::str::FromStr;

/// Helper to write a string as length-prefixed UTF-8 bytes.
fn write_string(s: &str, writer: &mut impl BufMut) {
    let bytes = s.as_bytes();
    (bytes.len() as u32).write(writer);
    writer.put_slice(bytes);
}

/// Helper to read a string from length-prefixed UTF-8 bytes.
fn read_string(reader: &mut impl Buf, max_len: usize) -> Result<String, Error> {
    let len = u32::read(reader)? as usize;
    if len > max_len {
        return Err(Error::Invalid("String", "too long"));
    }
    if reader.remaining() < len {
        return Err(Error::EndOfBuffer);
    }
    let mut bytes = vec![0u8; len];
    reader.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| Error::Invalid("String", "invalid UTF-8"))
}

/// Helper to get encode size of a string.
fn string_encode_size(s: &str) -> usize {
    4 + s.len()
}

/// Maximum length of a player identifier
pub const MAX_PLAYER_ID_LENGTH: usize = 64;

/// Maximum payload length for game moves
pub const MAX_PAYLOAD_LENGTH: usize = 256;

/// Maximum length of a per-game state blob
pub const MAX_STATE_LENGTH: usize = 1024;

/// Maximum length of a single outcome log line
pub const MAX_LOG_LENGTH: usize = 512;

/// Maximum number of outcome log lines carried by a settlement
pub const MAX_OUTCOME_LINES: usize = 64;

/// One full multiplier (1.00x) in basis points.
///
/// Payout multipliers are fixed-point throughout: 19_500 = 1.95x,
/// 25_000 = 2.5x. `win_amount = bet * multiplier / MULTIPLIER_ONE`.
pub const MULTIPLIER_ONE: u64 = 10_000;

/// Default chip grant used by test wallets and the simulator.
pub const DEFAULT_STARTING_CHIPS: u64 = 10_000;

/// Scale a chip amount by a basis-point multiplier, truncating toward zero.
///
/// Returns `None` on overflow. This is the single payout formula used by the
/// engine; settlements are exact in the sense that the recorded multiplier
/// and win amount always satisfy `win == scale_by_bps(bet, multiplier)`.
pub fn scale_by_bps(amount: u64, multiplier_bps: u64) -> Option<u64> {
    let scaled = (amount as u128).checked_mul(multiplier_bps as u128)? / MULTIPLIER_ONE as u128;
    u64::try_from(scaled).ok()
}

/// Casino game types matching the web client's game identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GameType {
    Slots = 0,
    Dice = 1,
    Coinflip = 2,
    Roulette = 3,
    Wheel = 4,
    Baccarat = 5,
    Keno = 6,
    Plinko = 7,
    Crash = 8,
    Mines = 9,
    HiLo = 10,
    Blackjack = 11,
}

impl GameType {
    /// All supported games, in wire order.
    pub fn all() -> &'static [GameType] {
        &[
            Self::Slots,
            Self::Dice,
            Self::Coinflip,
            Self::Roulette,
            Self::Wheel,
            Self::Baccarat,
            Self::Keno,
            Self::Plinko,
            Self::Crash,
            Self::Mines,
            Self::HiLo,
            Self::Blackjack,
        ]
    }

    /// Stable string identifier used at the web boundary.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Slots => "slots",
            Self::Dice => "dice",
            Self::Coinflip => "coinflip",
            Self::Roulette => "roulette",
            Self::Wheel => "wheel",
            Self::Baccarat => "baccarat",
            Self::Keno => "keno",
            Self::Plinko => "plinko",
            Self::Crash => "crash",
            Self::Mines => "mines",
            Self::HiLo => "hilo",
            Self::Blackjack => "blackjack",
        }
    }

    /// True for games that hold session state across multiple moves.
    ///
    /// Single-draw games resolve on their first move; multi-step games carry
    /// a state blob between requests (deal/hit/stand, grid reveals, streaks).
    pub fn is_multi_step(&self) -> bool {
        matches!(self, Self::Mines | Self::HiLo | Self::Blackjack)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for an unrecognized game identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown game type: {0}")]
pub struct UnknownGameType(pub String);

impl FromStr for GameType {
    type Err = UnknownGameType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|g| g.id() == s)
            .ok_or_else(|| UnknownGameType(s.to_string()))
    }
}

impl Write for GameType {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for GameType {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Slots),
            1 => Ok(Self::Dice),
            2 => Ok(Self::Coinflip),
            3 => Ok(Self::Roulette),
            4 => Ok(Self::Wheel),
            5 => Ok(Self::Baccarat),
            6 => Ok(Self::Keno),
            7 => Ok(Self::Plinko),
            8 => Ok(Self::Crash),
            9 => Ok(Self::Mines),
            10 => Ok(Self::HiLo),
            11 => Ok(Self::Blackjack),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for GameType {
    const SIZE: usize = 1;
}

/// Classification of a settled bet relative to its stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RoundResult {
    Win = 0,
    Push = 1,
    Loss = 2,
}

impl RoundResult {
    /// Classify from the settlement multiplier: above 1x is a win, exactly 1x
    /// returns the stake, anything below (including partial payouts) is a loss.
    pub fn classify(multiplier_bps: u64) -> Self {
        if multiplier_bps > MULTIPLIER_ONE {
            Self::Win
        } else if multiplier_bps == MULTIPLIER_ONE {
            Self::Push
        } else {
            Self::Loss
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Push => "push",
            Self::Loss => "loss",
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Write for RoundResult {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for RoundResult {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Win),
            1 => Ok(Self::Push),
            2 => Ok(Self::Loss),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for RoundResult {
    const SIZE: usize = 1;
}

/// Game session state.
///
/// Sessions are produced by the engine and held by the caller between
/// requests; the engine stores nothing. `state_blob` is an opaque,
/// game-specific binary blob and every payout-affecting quantity is
/// re-derived from it on each move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub id: u64,
    pub player: String,
    pub game_type: GameType,
    pub bet: u64,
    pub state_blob: Vec<u8>,
    pub move_count: u32,
    pub created_at: u64,
    pub is_complete: bool,
}

impl Write for GameSession {
    fn write(&self, writer: &mut impl BufMut) {
        self.id.write(writer);
        write_string(&self.player, writer);
        self.game_type.write(writer);
        self.bet.write(writer);
        self.state_blob.write(writer);
        self.move_count.write(writer);
        self.created_at.write(writer);
        self.is_complete.write(writer);
    }
}

impl Read for GameSession {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            id: u64::read(reader)?,
            player: read_string(reader, MAX_PLAYER_ID_LENGTH)?,
            game_type: GameType::read(reader)?,
            bet: u64::read(reader)?,
            state_blob: Vec::<u8>::read_range(reader, 0..=MAX_STATE_LENGTH)?,
            move_count: u32::read(reader)?,
            created_at: u64::read(reader)?,
            is_complete: bool::read(reader)?,
        })
    }
}

impl EncodeSize for GameSession {
    fn encode_size(&self) -> usize {
        self.id.encode_size()
            + string_encode_size(&self.player)
            + self.game_type.encode_size()
            + self.bet.encode_size()
            + self.state_blob.encode_size()
            + self.move_count.encode_size()
            + self.created_at.encode_size()
            + self.is_complete.encode_size()
    }
}

/// The settled outcome of a bet.
///
/// `outcome` carries the per-game draw record (rolled number, dealt hands,
/// mine grid) as JSON object lines for the history collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BetSettlement {
    pub result: RoundResult,
    pub multiplier_bps: u64,
    pub win_amount: u64,
    pub bet: u64,
    pub outcome: Vec<String>,
}

impl BetSettlement {
    /// Build a settlement from a terminal multiplier.
    ///
    /// Returns `None` only if `bet * multiplier` overflows.
    pub fn from_multiplier(bet: u64, multiplier_bps: u64, outcome: Vec<String>) -> Option<Self> {
        let win_amount = scale_by_bps(bet, multiplier_bps)?;
        Some(Self {
            result: RoundResult::classify(multiplier_bps),
            multiplier_bps,
            win_amount,
            bet,
            outcome,
        })
    }
}

fn write_log_lines(lines: &[String], writer: &mut impl BufMut) {
    (lines.len() as u32).write(writer);
    for line in lines {
        write_string(line, writer);
    }
}

fn read_log_lines(reader: &mut impl Buf) -> Result<Vec<String>, Error> {
    let count = u32::read(reader)? as usize;
    if count > MAX_OUTCOME_LINES {
        return Err(Error::Invalid("BetSettlement", "too many outcome lines"));
    }
    let mut lines = Vec::with_capacity(count);
    for _ in 0..count {
        lines.push(read_string(reader, MAX_LOG_LENGTH)?);
    }
    Ok(lines)
}

fn log_lines_encode_size(lines: &[String]) -> usize {
    4 + lines.iter().map(|l| string_encode_size(l)).sum::<usize>()
}

impl Write for BetSettlement {
    fn write(&self, writer: &mut impl BufMut) {
        self.result.write(writer);
        self.multiplier_bps.write(writer);
        self.win_amount.write(writer);
        self.bet.write(writer);
        write_log_lines(&self.outcome, writer);
    }
}

impl Read for BetSettlement {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            result: RoundResult::read(reader)?,
            multiplier_bps: u64::read(reader)?,
            win_amount: u64::read(reader)?,
            bet: u64::read(reader)?,
            outcome: read_log_lines(reader)?,
        })
    }
}

impl EncodeSize for BetSettlement {
    fn encode_size(&self) -> usize {
        self.result.encode_size()
            + self.multiplier_bps.encode_size()
            + self.win_amount.encode_size()
            + self.bet.encode_size()
            + log_lines_encode_size(&self.outcome)
    }
}

/// Events emitted by the settlement layer for the history/audit collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CasinoEvent {
    /// A session was opened and the stake debited.
    /// Binary: [0] [sessionId:u64 BE] [player] [gameType:u8] [bet:u64 BE]
    SessionStarted {
        session_id: u64,
        player: String,
        game_type: GameType,
        bet: u64,
    },

    /// A bet reached a terminal state and was settled.
    /// Binary: [1] [sessionId:u64 BE] [player] [gameType:u8] [settlement]
    BetSettled {
        session_id: u64,
        player: String,
        game_type: GameType,
        settlement: BetSettlement,
    },
}

impl Write for CasinoEvent {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::SessionStarted {
                session_id,
                player,
                game_type,
                bet,
            } => {
                0u8.write(writer);
                session_id.write(writer);
                write_string(player, writer);
                game_type.write(writer);
                bet.write(writer);
            }
            Self::BetSettled {
                session_id,
                player,
                game_type,
                settlement,
            } => {
                1u8.write(writer);
                session_id.write(writer);
                write_string(player, writer);
                game_type.write(writer);
                settlement.write(writer);
            }
        }
    }
}

impl Read for CasinoEvent {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let tag = u8::read(reader)?;
        match tag {
            0 => Ok(Self::SessionStarted {
                session_id: u64::read(reader)?,
                player: read_string(reader, MAX_PLAYER_ID_LENGTH)?,
                game_type: GameType::read(reader)?,
                bet: u64::read(reader)?,
            }),
            1 => Ok(Self::BetSettled {
                session_id: u64::read(reader)?,
                player: read_string(reader, MAX_PLAYER_ID_LENGTH)?,
                game_type: GameType::read(reader)?,
                settlement: BetSettlement::read(reader)?,
            }),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for CasinoEvent {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::SessionStarted {
                session_id,
                player,
                game_type,
                bet,
            } => {
                session_id.encode_size()
                    + string_encode_size(player)
                    + game_type.encode_size()
                    + bet.encode_size()
            }
            Self::BetSettled {
                session_id,
                player,
                game_type,
                settlement,
            } => {
                session_id.encode_size()
                    + string_encode_size(player)
                    + game_type.encode_size()
                    + settlement.encode_size()
            }
        }
    }
}
