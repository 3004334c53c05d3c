use commons::{
    AuthorityUpdateParams, AuthorityViewParams, ContractResult, ContractTokenAmount,
    ContractTokenId, CustomContractError, Token,
};
use concordium_cis2::OnReceivingCis2Params;
use concordium_std::*;

use crate::auction::CancelOutcome;
use crate::events::AuctionEvent;
use crate::external::*;
use crate::state::State;
use crate::token;

/// Initialize the auction house with its fee schedule and an empty registry.
#[init(contract = "AuctionHouse", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    Ok(State::new(
        state_builder,
        ctx.init_origin(),
        params.auction_min_balance,
        params.creation_fee,
    ))
}

/// Create a new auction instance record. The attached payment must cover the
/// instance reserve plus the creation fee; the sender becomes the seller.
#[receive(
    mutable,
    payable,
    contract = "AuctionHouse",
    name = "createAuction",
    return_value = "u64",
    enable_logger
)]
fn contract_create_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<u64> {
    let seller = match ctx.sender() {
        Address::Account(seller) => seller,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let reserve = host.state().auction_min_balance;
    let id = host.state_mut().create_auction(seller, amount)?;

    logger.log(&AuctionEvent::created(id, &seller, reserve))?;

    Ok(id)
}

/// Configure the asset accepted as payment for bids and the minimum bid.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "setBidAsset",
    parameter = "SetBidAssetParams",
    enable_logger
)]
fn contract_set_bid_asset<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = SetBidAssetParams::deserial(&mut ctx.parameter_cursor())
        .map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    host.state_mut().set_bid_asset(
        params.auction,
        &sender,
        params.bid_asset.clone(),
        params.min_bid,
    )?;

    logger.log(&AuctionEvent::bid_asset_set(
        params.auction,
        &params.bid_asset,
        params.min_bid,
    ))?;

    Ok(())
}

/// Escrow the auctioned asset with an instance. This function is intended to
/// be invoked by the asset's CIS-2 contract as the callback of a `transfer`
/// to this contract, carrying the auction id in the additional data.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "deposit",
    parameter = "OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>",
    enable_logger
)]
fn contract_deposit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let transfer_info: OnReceivingCis2Params<ContractTokenId, ContractTokenAmount> =
        OnReceivingCis2Params::deserial(&mut ctx.parameter_cursor())
            .map_err(CustomContractError::from)?;

    // Nothing to escrow if no tokens were transferred.
    if transfer_info.amount == ContractTokenAmount::from(0) {
        return Ok(());
    }

    let contract = match ctx.sender() {
        Address::Contract(contract) => contract,
        Address::Account(_) => bail!(CustomContractError::ContractOnly.into()),
    };
    let from = match transfer_info.from {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let params: AuctionParam =
        from_bytes(transfer_info.data.as_ref()).map_err(CustomContractError::from)?;
    let token = Token {
        contract,
        id: transfer_info.token_id,
    };

    host.state_mut()
        .deposit(params.auction, token.clone(), from, transfer_info.amount)?;

    logger.log(&AuctionEvent::deposited(
        params.auction,
        &token,
        &from,
        transfer_info.amount,
    ))?;

    Ok(())
}

/// Withdraw part of the escrowed lot back to the seller.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "withdrawAsset",
    parameter = "WithdrawAssetParams",
    enable_logger
)]
fn contract_withdraw_asset<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = WithdrawAssetParams::deserial(&mut ctx.parameter_cursor())
        .map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    let payout =
        host.state_mut()
            .withdraw_asset(params.auction, &sender, params.token, params.amount)?;

    logger.log(&AuctionEvent::withdrawn(
        params.auction,
        &payout.token,
        &payout.to,
        payout.amount,
    ))?;

    token::transfer(
        host,
        &payout.token,
        payout.amount,
        Address::Contract(ctx.self_address()),
        payout.to,
    )?;

    Ok(())
}

/// Close out the full holding of an asset to the seller. Clears the bid asset
/// registration when the named asset is the configured bid asset.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "removeAsset",
    parameter = "RemoveAssetParams",
    enable_logger
)]
fn contract_remove_asset<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = RemoveAssetParams::deserial(&mut ctx.parameter_cursor())
        .map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    let payout = host
        .state_mut()
        .remove_asset(params.auction, &sender, params.token)?;

    if let Some(payout) = payout {
        logger.log(&AuctionEvent::withdrawn(
            params.auction,
            &payout.token,
            &payout.to,
            payout.amount,
        ))?;

        token::transfer(
            host,
            &payout.token,
            payout.amount,
            Address::Contract(ctx.self_address()),
            payout.to,
        )?;
    }

    Ok(())
}

/// Freeze the configuration and schedule the bidding window.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "commit",
    parameter = "CommitParams",
    enable_logger
)]
fn contract_commit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params =
        CommitParams::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    host.state_mut().commit(
        params.auction,
        &sender,
        params.window,
        ctx.metadata().slot_time(),
    )?;

    logger.log(&AuctionEvent::committed(params.auction, params.window))?;

    Ok(())
}

/// Cancel an uncommitted instance, returning the lot to the seller.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "cancel",
    parameter = "AuctionParam",
    enable_logger
)]
fn contract_cancel<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params =
        AuctionParam::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    match host.state_mut().cancel(params.auction, &sender)? {
        CancelOutcome::Cancelled(payout) => {
            logger.log(&AuctionEvent::cancelled(params.auction))?;

            if let Some(payout) = payout {
                token::transfer(
                    host,
                    &payout.token,
                    payout.amount,
                    Address::Contract(ctx.self_address()),
                    payout.to,
                )?;
            }
        }
        // Cancelling an already cancelled instance is a no-op.
        CancelOutcome::AlreadyCancelled => (),
    }

    Ok(())
}

/// Submit a bid. This function is intended to be invoked by the bid asset's
/// CIS-2 contract as the callback of a `transfer` to this contract, carrying
/// the auction id in the additional data. A superseded bid is refunded within
/// the same call.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "bid",
    parameter = "OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let transfer_info: OnReceivingCis2Params<ContractTokenId, ContractTokenAmount> =
        OnReceivingCis2Params::deserial(&mut ctx.parameter_cursor())
            .map_err(CustomContractError::from)?;

    let contract = match ctx.sender() {
        Address::Contract(contract) => contract,
        Address::Account(_) => bail!(CustomContractError::ContractOnly.into()),
    };
    let bidder = match transfer_info.from {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let params: AuctionParam =
        from_bytes(transfer_info.data.as_ref()).map_err(CustomContractError::from)?;
    let token = Token {
        contract,
        id: transfer_info.token_id,
    };

    let refund = host.state_mut().bid(
        params.auction,
        token,
        bidder,
        transfer_info.amount,
        ctx.metadata().slot_time(),
    )?;

    logger.log(&AuctionEvent::bid(
        params.auction,
        &bidder,
        transfer_info.amount,
    ))?;

    // Refund the superseded bid.
    if let Some(refund) = refund {
        token::transfer(
            host,
            &refund.token,
            refund.amount,
            Address::Contract(ctx.self_address()),
            refund.to,
        )?;
    }

    Ok(())
}

/// Accept the winning bid once the window has ended. Status flip only; the
/// asset swap is performed by `finalize`, which anyone may call afterwards.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "acceptBid",
    parameter = "AuctionParam",
    enable_logger
)]
fn contract_accept_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params =
        AuctionParam::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;
    let sender = ctx.sender();

    let (winner, amount) =
        host.state_mut()
            .accept_bid(params.auction, &sender, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvent::bid_accepted(params.auction, &winner, amount))?;

    Ok(())
}

/// Close one escrowed holding out of an ended instance. For a sold auction
/// the lot pairs with the winning bidder and the bid escrow with the seller;
/// otherwise everything returns to the seller. The step that releases the
/// last holding flips the instance to `Finalized`.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "finalize",
    parameter = "FinalizeParams",
    enable_logger
)]
fn contract_finalize<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params =
        FinalizeParams::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;

    let settlement = host.state_mut().finalize(
        params.auction,
        params.asset,
        params.close_to,
        ctx.metadata().slot_time(),
    )?;

    logger.log(&AuctionEvent::payout(
        params.auction,
        &settlement.payout.token,
        &settlement.payout.to,
        settlement.payout.amount,
    ))?;
    if settlement.finalized {
        logger.log(&AuctionEvent::finalized(params.auction))?;
    }

    token::transfer(
        host,
        &settlement.payout.token,
        settlement.payout.amount,
        Address::Contract(ctx.self_address()),
        settlement.payout.to,
    )?;

    Ok(())
}

/// Drop a terminal instance record, releasing its reserve into the treasury.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "deleteFinalizedAuction",
    parameter = "AuctionParam",
    enable_logger
)]
fn contract_delete_finalized_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params =
        AuctionParam::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;

    let reserve = host.state_mut().delete_finalized_auction(params.auction)?;

    logger.log(&AuctionEvent::deleted(params.auction, reserve))?;

    Ok(())
}

/// Withdraw CCD from the treasury. Only the balance above the locked instance
/// reserves is available.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "withdraw",
    parameter = "WithdrawParams"
)]
fn contract_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        host.state().authority.has_admin_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    let params =
        WithdrawParams::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;
    let receiver = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    let treasury = host.state().treasury(host.self_balance());
    ensure!(
        params.amount <= treasury,
        CustomContractError::InsufficientBalance.into()
    );

    host.invoke_transfer(&receiver, params.amount)?;

    Ok(())
}

/// Update the fee schedule for instances created from now on. Existing
/// instances keep the reserve recorded at their creation.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "updateFees",
    parameter = "FeeValue"
)]
fn contract_update_fees<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        host.state().authority.has_admin_rights(&ctx.sender()),
        CustomContractError::Unauthorized.into()
    );
    let params =
        FeeValue::deserial(&mut ctx.parameter_cursor()).map_err(CustomContractError::from)?;

    let state = host.state_mut();
    match params {
        FeeValue::AuctionMinBalance(amount) => state.auction_min_balance = amount,
        FeeValue::CreationFee(amount) => state.creation_fee = amount,
    }

    Ok(())
}

/// CCD required to create an auction instance, recomputed from the current
/// fee schedule on every call.
#[receive(
    contract = "AuctionHouse",
    name = "getAuctionCreationFees",
    return_value = "Amount"
)]
fn contract_get_auction_creation_fees<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    Ok(host.state().creation_fees())
}

/// CCD available for withdrawal.
#[receive(
    contract = "AuctionHouse",
    name = "getTreasuryBalance",
    return_value = "Amount"
)]
fn contract_get_treasury_balance<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    Ok(host.state().treasury(host.self_balance()))
}

/// The current slot time, for clients deciding when to accept or finalize.
#[receive(
    contract = "AuctionHouse",
    name = "latestTimestamp",
    return_value = "Timestamp"
)]
fn contract_latest_timestamp<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Timestamp> {
    Ok(ctx.metadata().slot_time())
}

/// View one auction instance record together with its derived predicates.
#[receive(
    contract = "AuctionHouse",
    name = "viewAuction",
    parameter = "AuctionParam",
    return_value = "AuctionView"
)]
fn contract_view_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<AuctionView> {
    let params: AuctionParam = ctx.parameter_cursor().get()?;
    let slot_time = ctx.metadata().slot_time();

    let auction = host.state().auction(params.auction)?;

    Ok(AuctionView {
        is_bidding_open: auction.is_bidding_open(slot_time),
        is_ended: auction.is_ended(slot_time),
        is_sold: auction.is_sold(),
        seller: auction.seller,
        status: auction.status,
        bid_asset: auction.bid_asset,
        min_bid: auction.min_bid,
        window: auction.window,
        highest_bid: auction.highest_bid,
        highest_bidder: auction.highest_bidder,
        lot: auction.lot,
        reserve: auction.reserve,
    })
}

/// Function to manage addresses that are allowed to maintain and modify the
/// state of the contract.
#[receive(
    mutable,
    contract = "AuctionHouse",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<()> {
    let state = host.state_mut();
    let params = AuthorityUpdateParams::deserial(&mut ctx.parameter_cursor())?;
    let sender = ctx.sender();
    state.authority.handle_update(sender, params)
}

/// Function to view addresses that are allowed to maintain and modify the
/// state of the contract.
#[receive(
    contract = "AuctionHouse",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<Address>> {
    let params = AuthorityViewParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().authority.handle_view(params))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use commons::AuctionId;
    use concordium_cis2::{AdditionalData, Receiver, TokenAmountU64, TokenIdVec};
    use concordium_std::test_infrastructure::*;

    use crate::state::{AuctionStatus, BiddingWindow};

    const OWNER: AccountAddress = AccountAddress([0; 32]);
    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BIDDER_A: AccountAddress = AccountAddress([2; 32]);
    const BIDDER_B: AccountAddress = AccountAddress([3; 32]);
    const ANYONE: AccountAddress = AccountAddress([8; 32]);

    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 0,
        subindex: 0,
    };
    const ASSET_CONTRACT: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const BID_CONTRACT: ContractAddress = ContractAddress {
        index: 11,
        subindex: 0,
    };

    const START: u64 = 100;
    const END: u64 = 200;

    fn lot_token() -> Token {
        Token {
            contract: ASSET_CONTRACT,
            id: TokenIdVec(vec![1]),
        }
    }

    fn bid_token() -> Token {
        Token {
            contract: BID_CONTRACT,
            id: TokenIdVec(vec![2]),
        }
    }

    fn min_balance() -> Amount {
        Amount::from_micro_ccd(100_000)
    }

    fn creation_fee() -> Amount {
        Amount::from_micro_ccd(5_000)
    }

    fn fees() -> Amount {
        min_balance() + creation_fee()
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, OWNER, min_balance(), creation_fee());
        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(sender: Address, slot_time: u64) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(SELF_ADDRESS)
            .set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_time));
        ctx
    }

    /// Serialized CIS-2 receive hook parameter for `deposit` and `bid`.
    fn hook_params(
        auction: AuctionId,
        token_id: TokenIdVec,
        from: AccountAddress,
        amount: u64,
    ) -> Vec<u8> {
        to_bytes(&OnReceivingCis2Params {
            token_id,
            amount: TokenAmountU64(amount),
            from: Address::Account(from),
            data: AdditionalData::from(to_bytes(&AuctionParam { auction })),
        })
    }

    fn create_auction(host: &mut TestHost<State<TestStateApi>>) -> AuctionId {
        let ctx = receive_ctx(Address::Account(SELLER), 0);
        let mut logger = TestLogger::init();
        contract_create_auction(&ctx, host, fees(), &mut logger)
            .expect_report("Creation should pass")
    }

    fn deposit_lot(host: &mut TestHost<State<TestStateApi>>, auction: AuctionId, amount: u64) {
        let bytes = hook_params(auction, lot_token().id, SELLER, amount);
        let mut ctx = receive_ctx(Address::Contract(ASSET_CONTRACT), 0);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        contract_deposit(&ctx, host, &mut logger).expect_report("Deposit should pass");
    }

    fn set_bid_asset(host: &mut TestHost<State<TestStateApi>>, auction: AuctionId, min_bid: u64) {
        let params = SetBidAssetParams {
            auction,
            bid_asset: bid_token(),
            min_bid: TokenAmountU64(min_bid),
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(SELLER), 0);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        contract_set_bid_asset(&ctx, host, &mut logger)
            .expect_report("Setting bid asset should pass");
    }

    fn commit(host: &mut TestHost<State<TestStateApi>>, auction: AuctionId) {
        let params = CommitParams {
            auction,
            window: BiddingWindow {
                start: Timestamp::from_timestamp_millis(START),
                end: Timestamp::from_timestamp_millis(END),
            },
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(SELLER), 0);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        contract_commit(&ctx, host, &mut logger).expect_report("Commit should pass");
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        auction: AuctionId,
        bidder: AccountAddress,
        amount: u64,
        slot_time: u64,
    ) -> ContractResult<()> {
        let bytes = hook_params(auction, bid_token().id, bidder, amount);
        let mut ctx = receive_ctx(Address::Contract(BID_CONTRACT), slot_time);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        contract_bid(&ctx, host, &mut logger)
    }

    fn finalize(
        host: &mut TestHost<State<TestStateApi>>,
        auction: AuctionId,
        asset: Token,
        close_to: AccountAddress,
        slot_time: u64,
    ) -> ContractResult<()> {
        let params = FinalizeParams {
            auction,
            asset,
            close_to,
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(ANYONE), slot_time);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        contract_finalize(&ctx, host, &mut logger)
    }

    fn view(
        host: &TestHost<State<TestStateApi>>,
        auction: AuctionId,
        slot_time: u64,
    ) -> ReceiveResult<AuctionView> {
        let params = AuctionParam { auction };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(ANYONE), slot_time);
        ctx.set_parameter(&bytes);
        contract_view_auction(&ctx, host)
    }

    #[concordium_test]
    fn test_init() {
        let params = InitParams {
            auction_min_balance: min_balance(),
            creation_fee: creation_fee(),
        };
        let bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Contract initialization results in error");

        claim_eq!(state.auction_min_balance, min_balance());
        claim_eq!(state.creation_fee, creation_fee());
        claim_eq!(state.reserved, Amount::zero());
        claim_eq!(state.next_auction, 0);
        claim!(state.authority.has_admin_rights(&Address::Account(OWNER)));
    }

    #[concordium_test]
    fn test_create_auction_requires_fee() {
        let mut host = default_host();
        let ctx = receive_ctx(Address::Account(SELLER), 0);
        let mut logger = TestLogger::init();

        let short = Amount::from_micro_ccd(fees().micro_ccd - 1);
        let result = contract_create_auction(&ctx, &mut host, short, &mut logger);
        claim_eq!(result, Err(CustomContractError::InsufficientFee.into()));

        let result = contract_create_auction(&ctx, &mut host, fees(), &mut logger);
        claim_eq!(result, Ok(0));

        claim_eq!(host.state().reserved, min_balance());
    }

    #[concordium_test]
    fn test_deposit_guards() {
        let mut host = default_host();
        let auction = create_auction(&mut host);
        let mut logger = TestLogger::init();

        // The hook must be invoked by a token contract.
        let bytes = hook_params(auction, lot_token().id, SELLER, 1);
        let mut ctx = receive_ctx(Address::Account(SELLER), 0);
        ctx.set_parameter(&bytes);
        let result = contract_deposit(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::ContractOnly.into()));

        // Transfers from anyone but the seller are rejected.
        let bytes = hook_params(auction, lot_token().id, ANYONE, 1);
        let mut ctx = receive_ctx(Address::Contract(ASSET_CONTRACT), 0);
        ctx.set_parameter(&bytes);
        let result = contract_deposit(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        deposit_lot(&mut host, auction, 1);
        let auction_view = view(&host, auction, 0).expect_report("View should pass");
        claim_eq!(auction_view.lot.map(|lot| lot.amount), Some(TokenAmountU64(1)));
    }

    /// The full sale path: configure, commit, outbid with refund, accept
    /// after the window, settle both holdings, delete the instance and
    /// withdraw the proceeds.
    #[concordium_test]
    fn test_auction_sale_scenario() {
        let mut host = default_host();
        host.set_self_balance(fees());

        let auction = create_auction(&mut host);
        deposit_lot(&mut host, auction, 1);
        set_bid_asset(&mut host, auction, 10);
        commit(&mut host, auction);

        // Bidding before the window opens is rejected.
        let result = place_bid(&mut host, auction, BIDDER_A, 15, START - 1);
        claim_eq!(result, Err(CustomContractError::BiddingClosed.into()));

        // A first bid equal to the minimum bid does not strictly exceed it.
        let result = place_bid(&mut host, auction, BIDDER_A, 10, 150);
        claim_eq!(result, Err(CustomContractError::BidTooLow.into()));

        let result = place_bid(&mut host, auction, BIDDER_A, 15, 150);
        claim_eq!(result, Ok(()));

        // Outbidding refunds the previous highest bidder in the bid asset.
        host.setup_mock_entrypoint(
            BID_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                transfer.amount == TokenAmountU64(15)
                    && matches!(transfer.to, Receiver::Account(account) if account == BIDDER_A)
            }),
        );
        let result = place_bid(&mut host, auction, BIDDER_B, 20, 150);
        claim_eq!(result, Ok(()));

        let auction_view = view(&host, auction, 150).expect_report("View should pass");
        claim_eq!(auction_view.highest_bid, TokenAmountU64(20));
        claim_eq!(auction_view.highest_bidder, Some(BIDDER_B));
        claim!(auction_view.is_bidding_open);

        // Acceptance is gated on the window end.
        let params = AuctionParam { auction };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(SELLER), 150);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        let result = contract_accept_bid(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::AuctionStillActive.into()));

        let mut ctx = receive_ctx(Address::Account(SELLER), END + 50);
        ctx.set_parameter(&bytes);
        let result = contract_accept_bid(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        // Settlement step one: the winning bid goes to the seller.
        host.setup_mock_entrypoint(
            BID_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                transfer.amount == TokenAmountU64(20)
                    && matches!(transfer.to, Receiver::Account(account) if account == SELLER)
            }),
        );
        let result = finalize(&mut host, auction, bid_token(), SELLER, END + 50);
        claim_eq!(result, Ok(()));

        // Settlement step two: the lot goes to the winning bidder.
        host.setup_mock_entrypoint(
            ASSET_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                transfer.amount == TokenAmountU64(1)
                    && matches!(transfer.to, Receiver::Account(account) if account == BIDDER_B)
            }),
        );
        let result = finalize(&mut host, auction, lot_token(), BIDDER_B, END + 50);
        claim_eq!(result, Ok(()));

        let auction_view = view(&host, auction, END + 50).expect_report("View should pass");
        claim_eq!(auction_view.status, AuctionStatus::Finalized);
        claim!(auction_view.is_sold);

        // Settling a finalized instance is rejected.
        let result = finalize(&mut host, auction, lot_token(), BIDDER_B, END + 50);
        claim_eq!(result, Err(CustomContractError::InvalidAuctionState.into()));

        // Anyone may drop the record, releasing the reserve to the treasury.
        let mut ctx = receive_ctx(Address::Account(ANYONE), END + 50);
        ctx.set_parameter(&bytes);
        let result = contract_delete_finalized_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().reserved, Amount::zero());

        let treasury_ctx = receive_ctx(Address::Account(ANYONE), END + 50);
        let treasury = contract_get_treasury_balance(&treasury_ctx, &host)
            .expect_report("Treasury view should pass");
        claim_eq!(treasury, fees());

        // The owner withdraws the proceeds.
        let params = WithdrawParams { amount: fees() };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(OWNER), END + 50);
        ctx.set_parameter(&bytes);
        let result = contract_withdraw(&ctx, &mut host);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&OWNER, fees()));
    }

    #[concordium_test]
    fn test_delete_live_auction_rejected() {
        let mut host = default_host();
        let auction = create_auction(&mut host);
        deposit_lot(&mut host, auction, 1);
        set_bid_asset(&mut host, auction, 10);
        commit(&mut host, auction);

        let params = AuctionParam { auction };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(ANYONE), 150);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();
        let result = contract_delete_finalized_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::InvalidAuctionState.into()));
        claim_eq!(host.state().reserved, min_balance());
    }

    #[concordium_test]
    fn test_expiry_without_bids_returns_lot() {
        let mut host = default_host();
        let auction = create_auction(&mut host);
        deposit_lot(&mut host, auction, 1);
        set_bid_asset(&mut host, auction, 10);
        commit(&mut host, auction);

        host.setup_mock_entrypoint(
            ASSET_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                matches!(transfer.to, Receiver::Account(account) if account == SELLER)
            }),
        );

        let result = finalize(&mut host, auction, lot_token(), SELLER, END + 1);
        claim_eq!(result, Ok(()));

        let auction_view = view(&host, auction, END + 1).expect_report("View should pass");
        claim_eq!(auction_view.status, AuctionStatus::Finalized);
        claim!(!auction_view.is_sold);
    }

    #[concordium_test]
    fn test_cancel_returns_lot_and_is_idempotent() {
        let mut host = default_host();
        let auction = create_auction(&mut host);
        deposit_lot(&mut host, auction, 1);

        host.setup_mock_entrypoint(
            ASSET_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            check_transfer_mock(|params| {
                let transfer = &params.0[0];
                matches!(transfer.to, Receiver::Account(account) if account == SELLER)
            }),
        );

        let params = AuctionParam { auction };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(SELLER), 0);
        ctx.set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_cancel(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        let auction_view = view(&host, auction, 0).expect_report("View should pass");
        claim_eq!(auction_view.status, AuctionStatus::Cancelled);
        claim_eq!(auction_view.lot, None);
        claim!(auction_view.is_ended);

        // Repeated cancel is a no-op.
        let result = contract_cancel(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));

        // A cancelled instance may be deleted.
        let result = contract_delete_finalized_auction(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_withdraw_guards() {
        let mut host = default_host();
        host.set_self_balance(fees());
        let _auction = create_auction(&mut host);

        let params = WithdrawParams {
            amount: Amount::from_micro_ccd(1),
        };
        let bytes = to_bytes(&params);

        // Only admins may withdraw.
        let mut ctx = receive_ctx(Address::Account(ANYONE), 0);
        ctx.set_parameter(&bytes);
        let result = contract_withdraw(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        // The locked reserve is not withdrawable.
        let params = WithdrawParams { amount: fees() };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(OWNER), 0);
        ctx.set_parameter(&bytes);
        let result = contract_withdraw(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::InsufficientBalance.into()));

        // The flat creation fee part is.
        let params = WithdrawParams {
            amount: creation_fee(),
        };
        let bytes = to_bytes(&params);
        let mut ctx = receive_ctx(Address::Account(OWNER), 0);
        ctx.set_parameter(&bytes);
        let result = contract_withdraw(&ctx, &mut host);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&OWNER, creation_fee()));
    }

    #[concordium_test]
    fn test_update_fees_changes_creation_fees() {
        let mut host = default_host();

        let params = FeeValue::CreationFee(Amount::from_micro_ccd(9_000));
        let bytes = to_bytes(&params);

        let mut ctx = receive_ctx(Address::Account(ANYONE), 0);
        ctx.set_parameter(&bytes);
        let result = contract_update_fees(&ctx, &mut host);
        claim_eq!(result, Err(CustomContractError::Unauthorized.into()));

        let mut ctx = receive_ctx(Address::Account(OWNER), 0);
        ctx.set_parameter(&bytes);
        let result = contract_update_fees(&ctx, &mut host);
        claim_eq!(result, Ok(()));

        let view_ctx = receive_ctx(Address::Account(ANYONE), 0);
        let fees_now = contract_get_auction_creation_fees(&view_ctx, &host)
            .expect_report("Fee view should pass");
        claim_eq!(fees_now, min_balance() + Amount::from_micro_ccd(9_000));
    }

    #[concordium_test]
    fn test_latest_timestamp() {
        let host = default_host();
        let ctx = receive_ctx(Address::Account(ANYONE), 1234);

        let result =
            contract_latest_timestamp(&ctx, &host).expect_report("Timestamp view should pass");
        claim_eq!(result, Timestamp::from_timestamp_millis(1234));
    }

    #[concordium_test]
    fn test_view_unknown_auction() {
        let host = default_host();
        claim!(view(&host, 42, 0).is_err());
    }
}
