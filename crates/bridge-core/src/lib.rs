pub mod auction;
pub mod board;
pub mod call;
pub mod card;
pub mod contract;
pub mod deal;
pub mod error;
pub mod hand;
pub mod io;
pub mod play;
pub mod rank;
pub mod scoring;
pub mod strain;
pub mod suit;

pub use auction::{Auction, AuctionOutcome, AuctionStatus};
pub use board::{Board, Partnership, Position, Vulnerability};
pub use call::Call;
pub use card::Card;
pub use contract::{Contract, DoubleStatus};
pub use deal::Deal;
pub use error::{DealError, ErrorCategory, IllegalAction};
pub use hand::{Hand, Shape};
pub use play::{BoardResult, ContractResult, PlayOutcome, PlayState, Trick};
pub use rank::Rank;
pub use strain::Strain;
pub use suit::Suit;
