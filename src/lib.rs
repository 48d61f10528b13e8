//! A marketplace contract for non-fungible tokens.
//!
//! Tokens stay with their owners while listed; the owner lists a token for a
//! price after approving this contract as an operator on the token contract.
//! A buyer attaches at least the listed price, the token is transferred to
//! the buyer and the payment is accumulated as withdrawable proceeds for the
//! seller.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod errors;
mod events;
mod external;
mod nft;
mod state;
