use concordium_std::*;

use crate::errors::CustomContractError;
use crate::events::*;
use crate::external::*;
use crate::nft;
use crate::state::{Listing, State};

/// Initialize the marketplace contract with no listings and no proceeds.
#[init(contract = "NftMarketplace")]
fn init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::new(state_builder))
}

/// List a token for sale. The token stays with its owner; the owner must
/// have made this contract an approved operator on the token contract, so
/// that the sale transfer can be executed later without another
/// authorization step from the seller.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - The price is zero.
/// - The token is already listed.
/// - Sender does not own the token.
/// - This contract is not an approved operator for the token.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "listItem",
    parameter = "ListParams",
    enable_logger
)]
fn list_item<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let params = ListParams::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        params.price > Amount::zero(),
        CustomContractError::PriceMustBeAboveZero.into()
    );
    ensure!(
        host.state().listing(&params.token).is_none(),
        CustomContractError::ItemAlreadyListed.into()
    );

    let owner = nft::owner_of(host, &params.token)?;
    ensure_eq!(
        owner,
        Address::Account(sender),
        CustomContractError::InvalidOwner.into()
    );
    ensure!(
        nft::is_operator_of(host, &params.token, &ctx.self_address())?,
        CustomContractError::NotApprovedForMarketplace.into()
    );

    // Log token list event.
    logger.log(&MarketplaceEvent::listed(
        &params.token.contract,
        &params.token.id,
        &sender,
        params.price,
    ))?;

    host.state_mut().list(
        params.token,
        Listing {
            seller: sender,
            price: params.price,
        },
    );

    Ok(())
}

/// Update the price of an active listing. The seller is unchanged. Logs the
/// listing event with the new price; there is no separate update event.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - The token is not listed.
/// - Sender is not the listing seller.
/// - The new price is zero.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "updateListing",
    parameter = "ListParams",
    enable_logger
)]
fn update_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let params = ListParams::deserial(&mut ctx.parameter_cursor())?;

    let listing = host
        .state()
        .listing(&params.token)
        .ok_or_else(|| Reject::from(CustomContractError::NotListed))?;
    ensure_eq!(
        listing.seller,
        sender,
        CustomContractError::InvalidOwner.into()
    );
    ensure!(
        params.price > Amount::zero(),
        CustomContractError::PriceMustBeAboveZero.into()
    );

    logger.log(&MarketplaceEvent::listed(
        &params.token.contract,
        &params.token.id,
        &sender,
        params.price,
    ))?;

    host.state_mut().list(
        params.token,
        Listing {
            seller: listing.seller,
            price: params.price,
        },
    );

    Ok(())
}

/// Cancel an active listing.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - The token is not listed.
/// - Sender is not the listing seller.
#[receive(
    mutable,
    contract = "NftMarketplace",
    name = "cancelListing",
    parameter = "Token",
    enable_logger
)]
fn cancel_listing<S: HasStateApi>(
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
        .state()
        .listing(&token)
        .ok_or_else(|| Reject::from(CustomContractError::NotListed))?;
    ensure_eq!(
        listing.seller,
        sender,
        CustomContractError::InvalidOwner.into()
    );

    host.state_mut().unlist(&token)?;

    // Log listing cancel event.
    logger.log(&MarketplaceEvent::canceled(
        &token.contract,
        &token.id,
        &sender,
    ))?;

    Ok(())
}

/// Buy a listed token. The attached amount must cover the listed price and
/// is credited to the seller in full, so any overpayment becomes extra
/// proceeds rather than being refunded. The listing is cleared and the
/// proceeds credited before the token transfer is invoked; a failed transfer
/// rejects the update, so none of it persists.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - Sender is a contract address.
/// - The token is not listed.
/// - The attached amount is below the listed price.
/// - The token contract transfer rejects.
#[receive(
    mutable,
    payable,
    contract = "NftMarketplace",
    name = "buyItem",
    parameter = "Token",
    enable_logger
)]
fn buy_item<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ReceiveResult<()> {
    let buyer = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };
    let token = Token::deserial(&mut ctx.parameter_cursor())?;

    let listing = host
        .state()
        .listing(&token)
        .ok_or_else(|| Reject::from(CustomContractError::NotListed))?;
    ensure!(
        amount >= listing.price,
        CustomContractError::PriceNotMet.into()
    );

    host.state_mut().unlist(&token)?;
    host.state_mut().credit_proceeds(listing.seller, amount);

    // Log token buy event.
    logger.log(&MarketplaceEvent::bought(
        &token.contract,
        &token.id,
        &buyer,
        listing.price,
    ))?;

    // Transfer token to buyer.
    nft::transfer(host, token, listing.seller, buyer)?;

    Ok(())
}

/// Withdraw the accumulated sale proceeds of the sender. The balance is
/// zeroed before the CCD transfer is invoked; a failed transfer rejects the
/// update and the balance stays intact, so retrying is safe and withdrawing
/// twice is not possible.
///
/// Rejects if:
/// - Sender is a contract address.
/// - Sender has no proceeds to withdraw.
/// - The CCD transfer fails.
#[receive(mutable, contract = "NftMarketplace", name = "withdrawProceeds")]
fn withdraw_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let sender = match ctx.sender() {
        Address::Account(addr) => addr,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let balance = host.state_mut().take_proceeds(&sender)?;
    host.invoke_transfer(&sender, balance)
        .map_err(CustomContractError::from)?;

    Ok(())
}

/// View the active listing for a token, if any.
#[receive(
    contract = "NftMarketplace",
    name = "getListing",
    parameter = "Token",
    return_value = "Option<Listing>"
)]
fn get_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Option<Listing>> {
    let token = Token::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().listing(&token))
}

/// View the withdrawable proceeds of an account. Zero for accounts that
/// never sold anything.
#[receive(
    contract = "NftMarketplace",
    name = "getProceeds",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn get_proceeds<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    let account = AccountAddress::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().proceeds(&account))
}

#[concordium_cfg_test]
mod tests {
    use concordium_cis1::{TokenIdVec, TransferParams};
    use concordium_std::test_infrastructure::*;

    use super::*;

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const MARKETPLACE: ContractAddress = ContractAddress {
        index: 5,
        subindex: 0,
    };

    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BUYER: AccountAddress = AccountAddress([2; 32]);

    const PRICE: Amount = Amount::from_micro_ccd(10_000);

    fn token() -> Token {
        Token {
            contract: NFT_CONTRACT,
            id: TokenIdVec(vec![0]),
        }
    }

    fn parse_and_ok_mock<D: Deserial, R: Clone + Serial + 'static>(
        return_value: R,
    ) -> MockFn<State<TestStateApi>> {
        MockFn::new(
            move |parameter, _amount, _balance, _state| -> CallContractResult<R> {
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
                Ok((false, Some(return_value.clone())))
            },
        )
    }

    fn new_host() -> TestHost<State<TestStateApi>> {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();

        let state = init(&ctx, &mut state_builder).expect_report("Failed during init");

        TestHost::new(state, state_builder)
    }

    /// Mock the token contract: `owner` owns the token, `approved` controls
    /// whether the marketplace is an operator, transfers always succeed.
    fn setup_nft_mocks(
        host: &mut TestHost<State<TestStateApi>>,
        owner: AccountAddress,
        approved: bool,
    ) {
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("ownerOf".into()),
            parse_and_ok_mock::<TokenIdVec, _>(Address::Account(owner)),
        );
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("operatorOf".into()),
            parse_and_ok_mock::<nft::OperatorOfParams, _>(approved),
        );
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|param, _, _, _| {
                TransferParams::<TokenIdVec>::deserial(&mut Cursor::new(param.as_ref()))
                    .map_err(|_| CallContractError::Trap)?;
                Ok((true, ()))
            }),
        );
    }

    fn receive_ctx<'a>(sender: AccountAddress, parameter: &'a [u8]) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender))
            .set_invoker(sender)
            .set_self_address(MARKETPLACE)
            .set_parameter(parameter);
        ctx
    }

    fn list(host: &mut TestHost<State<TestStateApi>>, seller: AccountAddress, price: Amount) {
        let bytes = to_bytes(&ListParams {
            token: token(),
            price,
        });
        let ctx = receive_ctx(seller, &bytes);
        let mut logger = TestLogger::init();
        let result = list_item(&ctx, host, &mut logger);
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_init() {
        let ctx = TestInitContext::empty();
        let mut state_builder = TestStateBuilder::new();

        let result = init(&ctx, &mut state_builder);

        let state = result.expect_report("Failed during init");
        claim!(state.listing(&token()).is_none());
        claim_eq!(state.proceeds(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_get_listing_not_listed() {
        let host = new_host();

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let result = get_listing(&ctx, &host).expect_report("Failed to call getListing");

        claim_eq!(result, None);
    }

    #[concordium_test]
    fn test_list_item() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(
            host.state().listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::listed(
                &NFT_CONTRACT,
                &token().id,
                &SELLER,
                PRICE,
            ))
        );
    }

    #[concordium_test]
    fn test_list_item_no_duplicate() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::ItemAlreadyListed.into()));
    }

    #[concordium_test]
    fn test_list_item_owner_only() {
        let mut host = new_host();
        // Marketplace approval does not matter when the sender is not the owner.
        setup_nft_mocks(&mut host, SELLER, true);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::InvalidOwner.into()));
        claim!(host.state().listing(&token()).is_none());
    }

    #[concordium_test]
    fn test_list_item_needs_approval() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, false);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(
            result,
            Err(CustomContractError::NotApprovedForMarketplace.into())
        );
        claim!(host.state().listing(&token()).is_none());
    }

    #[concordium_test]
    fn test_list_item_zero_price() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: Amount::zero(),
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceMustBeAboveZero.into()));
    }

    #[concordium_test]
    fn test_update_listing() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let new_price = PRICE + PRICE;
        let bytes = to_bytes(&ListParams {
            token: token(),
            price: new_price,
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        // Price is replaced, seller is invariant across updates.
        claim_eq!(
            host.state().listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: new_price,
            })
        );
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::listed(
                &NFT_CONTRACT,
                &token().id,
                &SELLER,
                new_price,
            ))
        );
    }

    #[concordium_test]
    fn test_update_listing_seller_only() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE + PRICE,
        });
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::InvalidOwner.into()));
        claim_eq!(
            host.state().listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
    }

    #[concordium_test]
    fn test_update_listing_not_listed() {
        let mut host = new_host();

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_update_listing_zero_price() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: Amount::zero(),
        });
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = update_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceMustBeAboveZero.into()));
        claim_eq!(
            host.state().listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
    }

    #[concordium_test]
    fn test_cancel_listing() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(host.state().listing(&token()).is_none());
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::canceled(
                &NFT_CONTRACT,
                &token().id,
                &SELLER,
            ))
        );
    }

    #[concordium_test]
    fn test_cancel_listing_seller_only() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::InvalidOwner.into()));
        claim!(host.state().listing(&token()).is_some());
    }

    #[concordium_test]
    fn test_cancel_listing_not_listed() {
        let mut host = new_host();

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(SELLER, &bytes);
        let mut logger = TestLogger::init();

        let result = cancel_listing(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_buy_item() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);

        claim_eq!(result, Ok(()));
        claim!(host.state().listing(&token()).is_none());
        claim_eq!(host.state().proceeds(&SELLER), PRICE);
        claim_eq!(logger.logs.len(), 1);
        claim_eq!(
            logger.logs[0],
            to_bytes(&MarketplaceEvent::bought(
                &NFT_CONTRACT,
                &token().id,
                &BUYER,
                PRICE,
            ))
        );

        // The listing is gone, buying again fails.
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();
        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);
        claim_eq!(result, Err(CustomContractError::NotListed.into()));
        claim_eq!(host.state().proceeds(&SELLER), PRICE);
    }

    #[concordium_test]
    fn test_buy_item_price_not_met() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = buy_item(&ctx, &mut host, Amount::from_micro_ccd(1), &mut logger);

        claim_eq!(result, Err(CustomContractError::PriceNotMet.into()));
        // Listing and proceeds are untouched.
        claim_eq!(
            host.state().listing(&token()),
            Some(Listing {
                seller: SELLER,
                price: PRICE,
            })
        );
        claim_eq!(host.state().proceeds(&SELLER), Amount::zero());
    }

    #[concordium_test]
    fn test_buy_item_not_listed() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotListed.into()));
    }

    #[concordium_test]
    fn test_buy_item_transfer_failed() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        // Token contract rejects the sale transfer.
        host.setup_mock_entrypoint(
            NFT_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            MockFn::new_v1(|_, _, _, _| -> Result<(bool, ()), CallContractError<()>> {
                Err(CallContractError::Trap)
            }),
        );

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);

        claim_eq!(result, Err(CustomContractError::TransferFailed.into()));
    }

    #[concordium_test]
    fn test_buy_item_overpayment_goes_to_seller() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let paid = PRICE + Amount::from_micro_ccd(500);
        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();

        let result = buy_item(&ctx, &mut host, paid, &mut logger);

        claim_eq!(result, Ok(()));
        // The full attached amount is credited, the surplus is not refunded.
        claim_eq!(host.state().proceeds(&SELLER), paid);
    }

    #[concordium_test]
    fn test_withdraw_proceeds() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();
        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);
        claim_eq!(result, Ok(()));

        host.set_self_balance(PRICE);
        let ctx = receive_ctx(SELLER, &[]);
        let result = withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, PRICE));
        claim_eq!(host.state().proceeds(&SELLER), Amount::zero());

        // Nothing left, withdrawing again fails.
        let ctx = receive_ctx(SELLER, &[]);
        let result = withdraw_proceeds(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::NoProceeds.into()));
    }

    #[concordium_test]
    fn test_withdraw_proceeds_transfer_failed() {
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, PRICE);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();
        let result = buy_item(&ctx, &mut host, PRICE, &mut logger);
        claim_eq!(result, Ok(()));

        // Contract balance cannot cover the payout, the CCD transfer fails.
        host.set_self_balance(Amount::zero());
        let ctx = receive_ctx(SELLER, &[]);
        let result = withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Err(CustomContractError::TransferFailed.into()));
    }

    #[concordium_test]
    fn test_withdraw_proceeds_none() {
        let mut host = new_host();

        let ctx = receive_ctx(SELLER, &[]);
        let result = withdraw_proceeds(&ctx, &mut host);

        claim_eq!(result, Err(CustomContractError::NoProceeds.into()));
    }

    #[concordium_test]
    fn test_contract_sender_rejected() {
        let mut host = new_host();

        let bytes = to_bytes(&ListParams {
            token: token(),
            price: PRICE,
        });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(NFT_CONTRACT))
            .set_self_address(MARKETPLACE)
            .set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = list_item(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress.into()));
    }

    /// Full cycle: list at 0.01 CCD, buy at exactly that price, proceeds
    /// accumulate for the seller, withdrawal zeroes them, the token is no
    /// longer listed.
    #[concordium_test]
    fn test_sale_round_trip() {
        // 0.01 CCD.
        let price = Amount::from_micro_ccd(10_000);
        let mut host = new_host();
        setup_nft_mocks(&mut host, SELLER, true);
        list(&mut host, SELLER, price);

        let bytes = to_bytes(&token());
        let ctx = receive_ctx(BUYER, &bytes);
        let mut logger = TestLogger::init();
        let result = buy_item(&ctx, &mut host, price, &mut logger);
        claim_eq!(result, Ok(()));

        let proceeds_bytes = to_bytes(&SELLER);
        let ctx = receive_ctx(SELLER, &proceeds_bytes);
        let balance = get_proceeds(&ctx, &host).expect_report("Failed to call getProceeds");
        claim_eq!(balance, price);

        host.set_self_balance(price);
        let ctx = receive_ctx(SELLER, &[]);
        let result = withdraw_proceeds(&ctx, &mut host);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&SELLER, price));

        let ctx = receive_ctx(SELLER, &proceeds_bytes);
        let balance = get_proceeds(&ctx, &host).expect_report("Failed to call getProceeds");
        claim_eq!(balance, Amount::zero());

        let token_bytes = to_bytes(&token());
        let ctx = receive_ctx(SELLER, &token_bytes);
        let listing = get_listing(&ctx, &host).expect_report("Failed to call getListing");
        claim_eq!(listing, None);
    }
}
