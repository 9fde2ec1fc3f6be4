use commons::{CustomContractError, Token};
use concordium_std::*;

use crate::events::MarketplaceEvent;
use crate::external::*;
use crate::nft;
use crate::state::{Listing, State};

/// Initialize the marketplace with no listings and no proceeds.
#[init(contract = "NftMarketplace")]
fn contract_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::new(state_builder))
}

/// List an NFT for sale.
///
/// The seller keeps the token while it is listed; the marketplace only has to
/// be approved as transfer operator on the collection contract. Ownership and
/// approval are re-queried from the collection on every call.
///
/// Rejects if:
/// - Sender is a contract address.
/// - Sender is not the current token owner.
/// - The token is already listed.
/// - The marketplace is not approved to transfer the token.
/// - The price is zero.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "listItem",
    parameter = "ListParams",
    enable_logger
)]
fn contract_list_item<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let params = ListParams::deserial(&mut ctx.parameter_cursor())?;

    let owner = nft::owner_of(host, &params.token)?;
    let approved = nft::is_approved(host, &params.token, &ctx.self_address())?;

    host.state_mut()
        .list(params.token.clone(), sender, owner, approved, params.price)
        .map_err(CustomContractError::from)?;

    // Log NFT list event
    logger.log(&MarketplaceEvent::listed(
        &params.token.contract,
        &params.token.id,
        &sender,
        params.price,
    ))?;

    Ok(())
}

/// Cancel a listing. Only the listing's seller may cancel it.
///
/// Rejects if:
/// - Sender is a contract address.
/// - The token is not listed.
/// - Sender is not the seller.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "cancelListing",
    parameter = "Token",
    enable_logger
)]
fn contract_cancel_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let token = Token::deserial(&mut ctx.parameter_cursor())?;

    let listing = host
        .state_mut()
        .unlist(&token, &sender)
        .map_err(CustomContractError::from)?;

    // Log NFT unlist event
    logger.log(&MarketplaceEvent::canceled(
        &token.contract,
        &token.id,
        &listing.seller,
    ))?;

    Ok(())
}

/// Buy a listed NFT for the attached amount.
///
/// The seller is credited exactly the listed price on an internal balance and
/// withdraws it in a separate call; the sale itself transfers no CCD out.
/// Overpayment is accepted at face value and not refunded. The listing is
/// removed and the proceeds recorded before the collection contract is
/// invoked, so a reentrant call observes the post-sale state.
///
/// Rejects if:
/// - Sender is a contract address.
/// - The token is not listed.
/// - The attached amount is below the listing price.
/// - The collection contract rejects the token transfer.
#[receive(
    mutable,
    payable,
    contract = "NftMarketplace",
    name = "buyItem",
    parameter = "Token",
    enable_logger
)]
fn contract_buy_item<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let token = Token::deserial(&mut ctx.parameter_cursor())?;

    let listing = host
        .state_mut()
        .buy(&token, amount)
        .map_err(CustomContractError::from)?;

    // Log NFT buy event
    logger.log(&MarketplaceEvent::bought(
        &token.contract,
        &token.id,
        &sender,
        listing.price,
    ))?;

    // Token moves only after the listing is gone and the proceeds are recorded
    nft::transfer(host, token, listing.seller, sender)?;

    Ok(())
}

/// Update the price of a listing. Only the seller may update it. The new
/// price is announced with the same event as the initial listing.
///
/// Rejects if:
/// - Sender is a contract address.
/// - The token is not listed.
/// - Sender is not the seller.
/// - The new price is zero.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "updateListing",
    parameter = "UpdateListingParams",
    enable_logger
)]
fn contract_update_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let params = UpdateListingParams::deserial(&mut ctx.parameter_cursor())?;

    let listing = host
        .state_mut()
        .update_price(&params.token, &sender, params.new_price)
        .map_err(CustomContractError::from)?;

    // Log NFT list event
    logger.log(&MarketplaceEvent::listed(
        &params.token.contract,
        &params.token.id,
        &listing.seller,
        listing.price,
    ))?;

    Ok(())
}

/// Withdraw the caller's accrued sale proceeds.
///
/// The balance is zeroed before the transfer is invoked; a failed transfer
/// rejects the call and the zeroing is rolled back with it.
///
/// Rejects if:
/// - Sender is a contract address.
/// - The caller has no proceeds.
/// - The CCD transfer fails.
#[receive(mutable, contract = "NftMarketplace", name = "withdrawProceeds")]
fn contract_withdraw_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let amount = host
        .state_mut()
        .take_proceeds(&sender)
        .map_err(CustomContractError::from)?;

    host.invoke_transfer(&sender, amount)
        .map_err(CustomContractError::from)?;

    Ok(())
}

/// Look up a listing. Returns the zero price and the zero account address when
/// the token is not listed.
#[receive(
    contract = "NftMarketplace",
    name = "getListing",
    parameter = "Token",
    return_value = "Listing"
)]
fn contract_get_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Listing> {
    let token = Token::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().listing(&token))
}

/// Look up the proceeds accrued by an account. Returns zero when the account
/// never sold anything.
#[receive(
    contract = "NftMarketplace",
    name = "getProceeds",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn contract_get_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    let account = AccountAddress::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().proceeds_of(&account))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis1::{Receiver, TokenIdVec, TransferParams};
    use concordium_std::test_infrastructure::*;

    const COLLECTION: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 10,
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

    fn default_host() -> TestHost<State<TestStateApi>> {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();
        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_NftMarketplace");
        TestHost::new(state, state_builder)
    }

    fn mock_collection(
        host: &mut TestHost<State<TestStateApi>>,
        owner: AccountAddress,
        approved: bool,
    ) {
        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            MockFn::new_v1(move |param, _, _, _| {
                TokenIdVec::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((false, owner))
            }),
        );
        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("isApproved".into()),
            MockFn::new_v1(move |param, _, _, _| {
                ApprovalQueryParams::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((false, approved))
            }),
        );
    }

    /// Mock the collection transfer entrypoint, failing unless it is invoked
    /// with the expected sender and receiver accounts.
    fn mock_transfer(host: &mut TestHost<State<TestStateApi>>, from: AccountAddress, to: AccountAddress) {
        host.setup_mock_entrypoint(
            COLLECTION,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(move |param, _, _, _| {
                let params = TransferParams::<TokenIdVec>::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                let transfer = params.0.first().ok_or(CallContractError::Trap)?;
                match (&transfer.from, &transfer.to) {
                    (Address::Account(f), Receiver::Account(t)) if *f == from && *t == to => {}
                    _ => return Err(CallContractError::Trap),
                }
                Ok((true, ()))
            }),
        );
    }

    /// List `token(0)` at `PRICE` as `SELLER`.
    fn list_default(host: &mut TestHost<State<TestStateApi>>) {
        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, host, &mut logger);
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();

        claim_eq!(host.state().listing(&token(0)), Listing::absent());
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_list_item() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().listing(&token(0)),
            Listing {
                seller: SELLER,
                price: PRICE,
            }
        );
        claim_eq!(
            logger.logs,
            [to_bytes(&MarketplaceEvent::listed(
                &COLLECTION,
                &token(0).id,
                &SELLER,
                PRICE,
            ))]
        );
    }

    #[concordium_test]
    fn test_list_item_contract_sender() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Contract(COLLECTION))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress.into()));
    }

    #[concordium_test]
    fn test_list_item_not_owner() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(INTRUDER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
        claim_eq!(host.state().listing(&token(0)), Listing::absent());
    }

    #[concordium_test]
    fn test_list_item_already_listed() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE + PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::AlreadyListed.into()));
        // The original listing is untouched
        claim_eq!(host.state().listing(&token(0)).price, PRICE);
    }

    #[concordium_test]
    fn test_list_item_not_approved() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, false);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(
            result,
            Err(CustomContractError::NotApprovedForMarketplace.into())
        );
    }

    #[concordium_test]
    fn test_list_item_zero_price() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: Amount::zero(),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceMustBeAboveZero.into()));
    }

    #[concordium_test]
    fn test_list_item_ownership_is_checked_first() {
        let mut host = default_host();
        // Neither owner nor approved, and the price is zero: the ownership
        // failure decides the error
        mock_collection(&mut host, SELLER, false);

        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: Amount::zero(),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(INTRUDER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
    }

    #[concordium_test]
    fn test_cancel_listing() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(host.state().listing(&token(0)), Listing::absent());
        claim_eq!(
            logger.logs,
            [to_bytes(&MarketplaceEvent::canceled(
                &COLLECTION,
                &token(0).id,
                &SELLER,
            ))]
        );
    }

    #[concordium_test]
    fn test_cancel_listing_not_listed() {
        let mut host = default_host();

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_cancel_listing_not_seller() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(INTRUDER))
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
        claim_eq!(host.state().listing(&token(0)).seller, SELLER);
    }

    #[concordium_test]
    fn test_update_listing() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);
        let new_price = PRICE + Amount::from_ccd(5);

        let mut ctx = TestReceiveContext::empty();
        let params = UpdateListingParams {
            token: token(0),
            new_price,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(host.state().listing(&token(0)).price, new_price);
        // A price update re-announces the listing
        claim_eq!(
            logger.logs,
            [to_bytes(&MarketplaceEvent::listed(
                &COLLECTION,
                &token(0).id,
                &SELLER,
                new_price,
            ))]
        );
    }

    #[concordium_test]
    fn test_update_listing_not_listed() {
        let mut host = default_host();

        let mut ctx = TestReceiveContext::empty();
        let params = UpdateListingParams {
            token: token(0),
            new_price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_update_listing_not_seller() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let params = UpdateListingParams {
            token: token(0),
            new_price: PRICE + PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(INTRUDER))
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
        claim_eq!(host.state().listing(&token(0)).price, PRICE);
    }

    #[concordium_test]
    fn test_update_listing_zero_price() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let params = UpdateListingParams {
            token: token(0),
            new_price: Amount::zero(),
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceMustBeAboveZero.into()));
        claim_eq!(host.state().listing(&token(0)).price, PRICE);
    }

    #[concordium_test]
    fn test_buy_item() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        mock_transfer(&mut host, SELLER, BUYER);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_buy_item(&ctx, &mut host, PRICE, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(host.state().listing(&token(0)), Listing::absent());
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);
        claim_eq!(
            logger.logs,
            [to_bytes(&MarketplaceEvent::bought(
                &COLLECTION,
                &token(0).id,
                &BUYER,
                PRICE,
            ))]
        );
    }

    #[concordium_test]
    fn test_buy_item_not_listed() {
        let mut host = default_host();
        mock_transfer(&mut host, SELLER, BUYER);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_buy_item(&ctx, &mut host, PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_buy_item_price_not_met() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        mock_transfer(&mut host, SELLER, BUYER);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result =
            contract_buy_item(&ctx, &mut host, PRICE - Amount::from_micro_ccd(1), &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceNotMet.into()));
        // The listing is unchanged and nothing was credited
        claim_eq!(
            host.state().listing(&token(0)),
            Listing {
                seller: SELLER,
                price: PRICE,
            }
        );
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_buy_item_overpayment_credits_listed_price() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        mock_transfer(&mut host, SELLER, BUYER);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_buy_item(&ctx, &mut host, PRICE + Amount::from_ccd(1), &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_buy_item_charges_updated_price() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        mock_transfer(&mut host, SELLER, BUYER);
        list_default(&mut host);
        let new_price = PRICE + Amount::from_ccd(5);

        let mut ctx = TestReceiveContext::empty();
        let params = UpdateListingParams {
            token: token(0),
            new_price,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_update_listing(&ctx, &mut host, &mut logger),
            Ok(())
        );

        // The original price no longer meets the listing
        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        let result = contract_buy_item(&ctx, &mut host, PRICE, &mut logger);
        claim_eq!(result, Err(CustomContractError::PriceNotMet.into()));

        let result = contract_buy_item(&ctx, &mut host, new_price, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().proceeds_of(&SELLER), new_price);
    }

    #[concordium_test]
    fn test_withdraw_proceeds() {
        let mut host = default_host();
        host.state_mut().proceeds.insert(SELLER, PRICE);
        host.set_self_balance(PRICE);

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER));

        let result = contract_withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, PRICE));
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_withdraw_proceeds_empty() {
        let mut host = default_host();

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER));

        let result = contract_withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Err(CustomContractError::NoProceeds.into()));
    }

    #[concordium_test]
    fn test_withdraw_proceeds_transfer_failed() {
        let mut host = default_host();
        host.state_mut().proceeds.insert(SELLER, PRICE);
        // The contract balance stays at zero, so the payout cannot succeed

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER));

        let result = contract_withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Err(CustomContractError::TransferFailed.into()));
    }

    #[concordium_test]
    fn test_get_listing_view() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        list_default(&mut host);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_parameter(&bytes);
        let result = contract_get_listing(&ctx, &host);
        claim_eq!(
            result,
            Ok(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(1));
        ctx.set_parameter(&bytes);
        let result = contract_get_listing(&ctx, &host);
        claim_eq!(result, Ok(Listing::absent()));
    }

    #[concordium_test]
    fn test_get_proceeds_view() {
        let mut host = default_host();
        host.state_mut().proceeds.insert(SELLER, PRICE);

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&SELLER);
        ctx.set_parameter(&bytes);
        let result = contract_get_proceeds(&ctx, &host);
        claim_eq!(result, Ok(PRICE));

        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&BUYER);
        ctx.set_parameter(&bytes);
        let result = contract_get_proceeds(&ctx, &host);
        claim_eq!(result, Ok(Amount::zero()));
    }

    #[concordium_test]
    fn test_marketplace_scenario() {
        let mut host = default_host();
        mock_collection(&mut host, SELLER, true);
        mock_transfer(&mut host, SELLER, BUYER);

        // Deployer lists token #0
        list_default(&mut host);

        // A second listing attempt on #0 fails
        let mut ctx = TestReceiveContext::empty();
        let params = ListParams {
            token: token(0),
            price: PRICE,
        };
        let bytes = to_bytes(&params);
        ctx.set_sender(Address::Account(SELLER))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_list_item(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AlreadyListed.into())
        );

        // Player buys at exactly the asking price
        let mut ctx = TestReceiveContext::empty();
        let bytes = to_bytes(&token(0));
        ctx.set_sender(Address::Account(BUYER)).set_parameter(&bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_buy_item(&ctx, &mut host, PRICE, &mut logger),
            Ok(())
        );
        claim_eq!(host.state().listing(&token(0)), Listing::absent());
        claim_eq!(host.state().proceeds_of(&SELLER), PRICE);

        // Deployer withdraws the full amount
        host.set_self_balance(PRICE);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(SELLER));
        claim_eq!(contract_withdraw_proceeds(&ctx, &mut host), Ok(()));
        claim!(host.transfer_occurred(&SELLER, PRICE));
        claim_eq!(host.state().proceeds_of(&SELLER), Amount::zero());
    }
}
