use concordium_std::*;

use crate::errors::CustomContractError;
use crate::external::Token;

/// An active sale offer. Absence of an entry for a token means the token is
/// not listed.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq, Clone)]
pub struct Listing {
    /// Account that listed the token. Must own it at listing time.
    pub seller: AccountAddress,
    /// Listed price, always above zero.
    pub price: Amount,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Active listings.
    pub listings: StateMap<Token, Listing, S>,
    /// Withdrawable sale proceeds per seller. Zeroed on withdrawal, entries
    /// are never removed.
    pub proceeds: StateMap<AccountAddress, Amount, S>,
}

// Functions for creating and updating the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no listings and no proceeds.
    pub fn new(state_builder: &mut StateBuilder<S>) -> Self {
        State {
            listings: state_builder.new_map(),
            proceeds: state_builder.new_map(),
        }
    }

    /// Look up the active listing for a token.
    pub fn listing(&self, token: &Token) -> Option<Listing> {
        self.listings.get(token).map(|listing| listing.clone())
    }

    /// Insert or overwrite a listing. Duplicate checks belong to the caller,
    /// since `updateListing` overwrites on purpose.
    pub fn list(&mut self, token: Token, listing: Listing) {
        self.listings.insert(token, listing);
    }

    /// Remove a listing, failing with NotListed if the token is not listed.
    /// Returns the removed listing.
    pub fn unlist(&mut self, token: &Token) -> ReceiveResult<Listing> {
        self.listings
            .remove_and_get(token)
            .ok_or_else(|| CustomContractError::NotListed.into())
    }

    /// Withdrawable balance of an account. Zero for accounts that never sold
    /// anything.
    pub fn proceeds(&self, account: &AccountAddress) -> Amount {
        self.proceeds
            .get(account)
            .map(|amount| *amount)
            .unwrap_or_else(Amount::zero)
    }

    /// Credit sale proceeds to a seller.
    pub fn credit_proceeds(&mut self, seller: AccountAddress, amount: Amount) {
        let balance = self.proceeds(&seller);
        self.proceeds.insert(seller, balance + amount);
    }

    /// Zero the balance of an account and return the previous balance.
    /// Fails with NoProceeds if there is nothing to withdraw.
    pub fn take_proceeds(&mut self, account: &AccountAddress) -> ReceiveResult<Amount> {
        let balance = self.proceeds(account);
        ensure!(
            balance > Amount::zero(),
            CustomContractError::NoProceeds.into()
        );
        self.proceeds.insert(*account, Amount::zero());
        Ok(balance)
    }
}
