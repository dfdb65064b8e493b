//! Domain models for the auction engine

pub mod auction;
pub mod bidder;
pub mod collaborators;
pub mod event;
pub mod inventory;
pub mod item;
pub mod location;
pub mod wallet;

// Re-exports
pub use auction::{Auction, AuctionDraft, AuctionPhase, AuctionStatus, CloseReason, Leader};
pub use bidder::{Bidder, Personality};
pub use collaborators::{Collaborators, Inventory, ItemGenerator, LocationCatalog, Wallet};
pub use event::{Event, EventLog};
pub use inventory::{StorageInventory, StoredItem, TemplateItemGenerator};
pub use item::{Condition, Item, Rarity};
pub use location::{LocationProfile, StaticLocationCatalog};
pub use wallet::{PlayerWallet, WalletError};
