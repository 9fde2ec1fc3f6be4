use commons::{CustomContractError, Token};
use concordium_std::*;

/// An active listing.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Account that listed the token and receives the sale proceeds.
    pub seller: AccountAddress,
    /// Asking price.
    pub price: Amount,
}

impl Listing {
    /// Sentinel returned to callers when a token is not listed: zero price and
    /// the zero account address. A listing exists iff its price is above zero.
    pub fn absent() -> Self {
        Listing {
            seller: AccountAddress([0u8; 32]),
            price: Amount::zero(),
        }
    }
}

/// Failures surfaced by the ledger operations. The listing errors carry the
/// exact token key they were raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    /// Caller is not the current owner of the token.
    NotOwner,
    /// Listings must have a price above zero.
    PriceMustBeAboveZero,
    /// Token is already listed.
    AlreadyListed(Token),
    /// Marketplace is not approved to transfer the token on the owner's behalf.
    NotApprovedForMarketplace,
    /// Token is not listed.
    NotListed(Token),
    /// Attached amount is below the listing price.
    PriceNotMet,
    /// Caller has no proceeds to withdraw.
    NoProceeds,
}

/// Mapping ledger errors to reject codes. Reject codes are fieldless, so the
/// token keys are only available to direct callers of the ledger.
impl From<MarketplaceError> for CustomContractError {
    fn from(e: MarketplaceError) -> Self {
        match e {
            MarketplaceError::NotOwner => CustomContractError::NotOwner,
            MarketplaceError::PriceMustBeAboveZero => CustomContractError::PriceMustBeAboveZero,
            MarketplaceError::AlreadyListed(_) => CustomContractError::AlreadyListed,
            MarketplaceError::NotApprovedForMarketplace => {
                CustomContractError::NotApprovedForMarketplace
            }
            MarketplaceError::NotListed(_) => CustomContractError::NotListed,
            MarketplaceError::PriceNotMet => CustomContractError::PriceNotMet,
            MarketplaceError::NoProceeds => CustomContractError::NoProceeds,
        }
    }
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Active listings.
    pub listings: StateMap<Token, Listing, S>,
    /// Sale proceeds accrued per seller. Entries are zeroed on withdrawal,
    /// never removed.
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

    /// Create a listing for the token.
    ///
    /// `owner` and `approved` are the facts the collection contract reported
    /// for this call. The checks run in a fixed order and the first failing
    /// check decides the error: ownership, existing listing, transfer
    /// approval, price floor.
    pub fn list(
        &mut self,
        token: Token,
        seller: AccountAddress,
        owner: AccountAddress,
        approved: bool,
        price: Amount,
    ) -> Result<(), MarketplaceError> {
        ensure!(seller == owner, MarketplaceError::NotOwner);
        ensure!(
            self.listings.get(&token).is_none(),
            MarketplaceError::AlreadyListed(token)
        );
        ensure!(approved, MarketplaceError::NotApprovedForMarketplace);
        ensure!(
            price > Amount::zero(),
            MarketplaceError::PriceMustBeAboveZero
        );
        self.listings.insert(token, Listing { seller, price });
        Ok(())
    }

    /// Remove the sender's listing and return it. Fails with `NotListed` if
    /// there is none and with `NotOwner` if the sender is not the seller.
    pub fn unlist(
        &mut self,
        token: &Token,
        sender: &AccountAddress,
    ) -> Result<Listing, MarketplaceError> {
        let listing = self
            .listings
            .get(token)
            .map(|listing| listing.clone())
            .ok_or_else(|| MarketplaceError::NotListed(token.clone()))?;
        ensure!(listing.seller == *sender, MarketplaceError::NotOwner);
        self.listings.remove(token);
        Ok(listing)
    }

    /// Settle a purchase: credit the seller with exactly the listed price and
    /// remove the listing. Nothing is mutated on failure, so an underpaid
    /// purchase leaves the listing untouched. Overpayment is accepted at face
    /// value and not refunded.
    pub fn buy(&mut self, token: &Token, paid: Amount) -> Result<Listing, MarketplaceError> {
        let listing = self
            .listings
            .get(token)
            .map(|listing| listing.clone())
            .ok_or_else(|| MarketplaceError::NotListed(token.clone()))?;
        ensure!(paid >= listing.price, MarketplaceError::PriceNotMet);
        let credited = self.proceeds_of(&listing.seller) + listing.price;
        self.proceeds.insert(listing.seller, credited);
        self.listings.remove(token);
        Ok(listing)
    }

    /// Update the price of the sender's listing and return the updated
    /// listing. The price floor mirrors `list`.
    pub fn update_price(
        &mut self,
        token: &Token,
        sender: &AccountAddress,
        new_price: Amount,
    ) -> Result<Listing, MarketplaceError> {
        let mut entry = self
            .listings
            .get_mut(token)
            .ok_or_else(|| MarketplaceError::NotListed(token.clone()))?;
        let listing = entry.get_mut();
        ensure!(listing.seller == *sender, MarketplaceError::NotOwner);
        ensure!(
            new_price > Amount::zero(),
            MarketplaceError::PriceMustBeAboveZero
        );
        listing.price = new_price;
        Ok(listing.clone())
    }

    /// Take the account's accrued proceeds, zeroing the entry. The transfer
    /// out is the caller's responsibility and must happen after this state
    /// change.
    pub fn take_proceeds(&mut self, account: &AccountAddress) -> Result<Amount, MarketplaceError> {
        let amount = self.proceeds_of(account);
        ensure!(amount > Amount::zero(), MarketplaceError::NoProceeds);
        self.proceeds.insert(*account, Amount::zero());
        Ok(amount)
    }

    /// Listing for the token, or the sentinel if there is none.
    pub fn listing(&self, token: &Token) -> Listing {
        self.listings
            .get(token)
            .map(|listing| listing.clone())
            .unwrap_or_else(Listing::absent)
    }

    /// Proceeds accrued by the account, zero if none were recorded.
    pub fn proceeds_of(&self, account: &AccountAddress) -> Amount {
        self.proceeds
            .get(account)
            .map(|amount| *amount)
            .unwrap_or_else(Amount::zero)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis1::TokenIdVec;
    use concordium_std::test_infrastructure::*;

    const COLLECTION: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BUYER: AccountAddress = AccountAddress([2; 32]);
    const INTRUDER: AccountAddress = AccountAddress([3; 32]);

    const PRICE: Amount = Amount::from_ccd(10);

    fn token(n: u8) -> Token {
        Token {
            contract: COLLECTION,
            id: TokenIdVec([n].to_vec()),
        }
    }

    fn empty_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(&mut state_builder)
    }

    fn listed_state() -> State<TestStateApi> {
        let mut state = empty_state();
        let result = state.list(token(0), SELLER, SELLER, true, PRICE);
        claim_eq!(result, Ok(()));
        state
    }

    #[concordium_test]
    fn test_list_and_read() {
        let state = listed_state();

        claim_eq!(
            state.listing(&token(0)),
            Listing {
                seller: SELLER,
                price: PRICE,
            }
        );
        // Other keys stay at the sentinel
        claim_eq!(state.listing(&token(1)), Listing::absent());
    }

    #[concordium_test]
    fn test_unlisted_key_reads_as_sentinel() {
        let state = empty_state();

        let listing = state.listing(&token(0));
        claim_eq!(listing.price, Amount::zero());
        claim_eq!(listing.seller, AccountAddress([0u8; 32]));
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_list_not_owner() {
        let mut state = empty_state();

        let result = state.list(token(0), INTRUDER, SELLER, true, PRICE);
        claim_eq!(result, Err(MarketplaceError::NotOwner));
        claim_eq!(state.listing(&token(0)), Listing::absent());
    }

    #[concordium_test]
    fn test_list_already_listed_carries_key() {
        let mut state = listed_state();

        let result = state.list(token(0), SELLER, SELLER, true, PRICE);
        claim_eq!(result, Err(MarketplaceError::AlreadyListed(token(0))));

        // Same error for a different caller that owns the token by now
        let result = state.list(token(0), BUYER, BUYER, true, PRICE);
        claim_eq!(result, Err(MarketplaceError::AlreadyListed(token(0))));
    }

    #[concordium_test]
    fn test_list_not_approved() {
        let mut state = empty_state();

        let result = state.list(token(0), SELLER, SELLER, false, PRICE);
        claim_eq!(result, Err(MarketplaceError::NotApprovedForMarketplace));
    }

    #[concordium_test]
    fn test_list_zero_price() {
        let mut state = empty_state();

        let result = state.list(token(0), SELLER, SELLER, true, Amount::zero());
        claim_eq!(result, Err(MarketplaceError::PriceMustBeAboveZero));
    }

    #[concordium_test]
    fn test_list_first_failing_check_decides_the_error() {
        let mut state = listed_state();

        // Ownership is checked before the existing listing
        let result = state.list(token(0), INTRUDER, SELLER, true, PRICE);
        claim_eq!(result, Err(MarketplaceError::NotOwner));

        // The existing listing is checked before approval and price
        let result = state.list(token(0), SELLER, SELLER, false, Amount::zero());
        claim_eq!(result, Err(MarketplaceError::AlreadyListed(token(0))));

        // Approval is checked before the price floor
        let result = state.list(token(1), SELLER, SELLER, false, Amount::zero());
        claim_eq!(result, Err(MarketplaceError::NotApprovedForMarketplace));
    }

    #[concordium_test]
    fn test_unlist() {
        let mut state = listed_state();

        let result = state.unlist(&token(0), &SELLER);
        claim_eq!(
            result,
            Ok(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
        claim_eq!(state.listing(&token(0)), Listing::absent());
    }

    #[concordium_test]
    fn test_unlist_not_listed_carries_key() {
        let mut state = empty_state();

        let result = state.unlist(&token(0), &SELLER);
        claim_eq!(result, Err(MarketplaceError::NotListed(token(0))));
    }

    #[concordium_test]
    fn test_unlist_not_owner() {
        let mut state = listed_state();

        let result = state.unlist(&token(0), &INTRUDER);
        claim_eq!(result, Err(MarketplaceError::NotOwner));
        // The listing survives the failed attempt
        claim_eq!(state.listing(&token(0)).seller, SELLER);
    }

    #[concordium_test]
    fn test_buy() {
        let mut state = listed_state();

        let result = state.buy(&token(0), PRICE);
        claim_eq!(
            result,
            Ok(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
        claim_eq!(state.listing(&token(0)), Listing::absent());
        claim_eq!(state.proceeds_of(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_buy_credits_listed_price_not_paid_amount() {
        let mut state = listed_state();

        let result = state.buy(&token(0), PRICE + Amount::from_ccd(5));
        claim_eq!(result.map(|listing| listing.price), Ok(PRICE));
        claim_eq!(state.proceeds_of(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_buy_accumulates_proceeds() {
        let mut state = listed_state();
        claim_eq!(state.buy(&token(0), PRICE).map(|_| ()), Ok(()));

        claim_eq!(state.list(token(1), SELLER, SELLER, true, PRICE), Ok(()));
        claim_eq!(state.buy(&token(1), PRICE).map(|_| ()), Ok(()));

        claim_eq!(state.proceeds_of(&SELLER), PRICE + PRICE);
    }

    #[concordium_test]
    fn test_buy_price_not_met() {
        let mut state = listed_state();

        let result = state.buy(&token(0), PRICE - Amount::from_micro_ccd(1));
        claim_eq!(result, Err(MarketplaceError::PriceNotMet));
        // The listing and the proceeds are untouched
        claim_eq!(state.listing(&token(0)).price, PRICE);
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_buy_not_listed_carries_key() {
        let mut state = empty_state();

        let result = state.buy(&token(0), PRICE);
        claim_eq!(result, Err(MarketplaceError::NotListed(token(0))));
    }

    #[concordium_test]
    fn test_update_price() {
        let mut state = listed_state();
        let new_price = PRICE + Amount::from_ccd(5);

        let result = state.update_price(&token(0), &SELLER, new_price);
        claim_eq!(
            result,
            Ok(Listing {
                seller: SELLER,
                price: new_price,
            })
        );

        // A subsequent purchase settles at the updated price
        claim_eq!(state.buy(&token(0), PRICE), Err(MarketplaceError::PriceNotMet));
        claim_eq!(state.buy(&token(0), new_price).map(|_| ()), Ok(()));
        claim_eq!(state.proceeds_of(&SELLER), new_price);
    }

    #[concordium_test]
    fn test_update_price_not_listed_carries_key() {
        let mut state = empty_state();

        let result = state.update_price(&token(0), &SELLER, PRICE);
        claim_eq!(result, Err(MarketplaceError::NotListed(token(0))));
    }

    #[concordium_test]
    fn test_update_price_not_owner() {
        let mut state = listed_state();

        let result = state.update_price(&token(0), &INTRUDER, PRICE + PRICE);
        claim_eq!(result, Err(MarketplaceError::NotOwner));
        claim_eq!(state.listing(&token(0)).price, PRICE);
    }

    #[concordium_test]
    fn test_update_price_zero() {
        let mut state = listed_state();

        let result = state.update_price(&token(0), &SELLER, Amount::zero());
        claim_eq!(result, Err(MarketplaceError::PriceMustBeAboveZero));
        claim_eq!(state.listing(&token(0)).price, PRICE);
    }

    #[concordium_test]
    fn test_take_proceeds() {
        let mut state = listed_state();
        claim_eq!(state.buy(&token(0), PRICE).map(|_| ()), Ok(()));

        let result = state.take_proceeds(&SELLER);
        claim_eq!(result, Ok(PRICE));
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());

        // A second withdrawal finds nothing
        let result = state.take_proceeds(&SELLER);
        claim_eq!(result, Err(MarketplaceError::NoProceeds));
    }

    #[concordium_test]
    fn test_take_proceeds_empty() {
        let mut state = empty_state();

        let result = state.take_proceeds(&SELLER);
        claim_eq!(result, Err(MarketplaceError::NoProceeds));
    }

    #[concordium_test]
    fn test_sale_scenario() {
        let mut state = empty_state();

        // Deployer lists token #0
        claim_eq!(state.list(token(0), SELLER, SELLER, true, PRICE), Ok(()));
        // A second listing attempt fails with the exact key
        claim_eq!(
            state.list(token(0), SELLER, SELLER, true, PRICE),
            Err(MarketplaceError::AlreadyListed(token(0)))
        );
        // Player buys at exactly the asking price
        let listing = state.buy(&token(0), PRICE);
        claim_eq!(listing.map(|listing| listing.seller), Ok(SELLER));
        claim_eq!(state.listing(&token(0)), Listing::absent());
        // Deployer's proceeds equal the price and are withdrawn in full
        claim_eq!(state.proceeds_of(&SELLER), PRICE);
        claim_eq!(state.take_proceeds(&SELLER), Ok(PRICE));
        claim_eq!(state.proceeds_of(&SELLER), Amount::zero());
    }
}
