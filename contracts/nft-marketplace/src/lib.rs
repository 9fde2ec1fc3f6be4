//! NFT marketplace contract. It exposes functions for listing NFTs for sale,
//! updating and cancelling listings, buying listed NFTs and withdrawing the
//! accrued sale proceeds.
//!
//! Tokens stay with their owner while listed; the marketplace only has to be
//! approved as transfer operator on the collection contract. Sale proceeds are
//! credited to an internal balance and withdrawn by the seller in a separate
//! call.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod nft;
mod state;
