use commons::{AuctionId, ContractTokenAmount, CustomContractError, Token};
use concordium_cis2::TokenAmountU64;
use concordium_std::*;

use crate::state::{AuctionData, AuctionStatus, BiddingWindow, Lot, State};

/// A token transfer the entry point layer must execute after a transition.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Payout {
    pub token: Token,
    pub amount: ContractTokenAmount,
    pub to: AccountAddress,
}

/// Result of one finalization step.
#[must_use]
pub struct Settlement {
    pub payout: Payout,
    /// Whether this step released the last escrowed holding.
    pub finalized: bool,
}

/// Result of a cancel call.
#[must_use]
pub enum CancelOutcome {
    /// The instance moved to `Cancelled`; the lot, if any, must be returned.
    Cancelled(Option<Payout>),
    /// The instance was already cancelled. Nothing to do.
    AlreadyCancelled,
}

impl<S: HasStateApi> State<S> {
    /// Create a fresh instance record owned by `seller`, locking its reserve.
    pub fn create_auction(
        &mut self,
        seller: AccountAddress,
        paid: Amount,
    ) -> Result<AuctionId, CustomContractError> {
        ensure!(
            paid >= self.creation_fees(),
            CustomContractError::InsufficientFee
        );

        let id = self.next_auction;
        self.next_auction += 1;
        let reserve = self.auction_min_balance;
        self.auctions.insert(id, AuctionData::new(seller, reserve));
        self.reserved += reserve;

        Ok(id)
    }

    /// Configure the asset accepted as payment for bids.
    pub fn set_bid_asset(
        &mut self,
        id: AuctionId,
        sender: &Address,
        bid_asset: Token,
        min_bid: ContractTokenAmount,
    ) -> Result<(), CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::New,
            CustomContractError::InvalidAuctionState
        );
        ensure!(min_bid > TokenAmountU64(0), CustomContractError::ZeroAmount);
        // Changing the bid asset requires removing the current registration
        // first; re-setting the same asset may update the minimum bid.
        if let Some(current) = &auction.bid_asset {
            ensure_eq!(current, &bid_asset, CustomContractError::BidAssetMismatch);
        }
        if let Some(lot) = &auction.lot {
            ensure!(
                lot.token != bid_asset,
                CustomContractError::BidAssetMismatch
            );
        }

        auction.bid_asset = Some(bid_asset);
        auction.min_bid = min_bid;

        Ok(())
    }

    /// Register an escrow deposit of the auctioned asset.
    pub fn deposit(
        &mut self,
        id: AuctionId,
        token: Token,
        from: AccountAddress,
        amount: ContractTokenAmount,
    ) -> Result<(), CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure_eq!(from, auction.seller, CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::New,
            CustomContractError::InvalidAuctionState
        );
        if let Some(bid_asset) = &auction.bid_asset {
            ensure!(*bid_asset != token, CustomContractError::BidAssetMismatch);
        }

        match &mut auction.lot {
            // One asset position per instance; repeated deposits of the same
            // token accumulate.
            Some(lot) => {
                ensure_eq!(lot.token, token, CustomContractError::LotMismatch);
                lot.amount += amount;
            }
            None => auction.lot = Some(Lot { token, amount }),
        }

        Ok(())
    }

    /// Withdraw part of the escrowed lot back to the seller.
    pub fn withdraw_asset(
        &mut self,
        id: AuctionId,
        sender: &Address,
        token: Token,
        amount: ContractTokenAmount,
    ) -> Result<Payout, CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::New,
            CustomContractError::InvalidAuctionState
        );
        ensure!(amount > TokenAmountU64(0), CustomContractError::ZeroAmount);

        let lot = auction
            .lot
            .as_mut()
            .ok_or(CustomContractError::LotMismatch)?;
        ensure_eq!(lot.token, token, CustomContractError::LotMismatch);
        ensure!(
            amount <= lot.amount,
            CustomContractError::InsufficientBalance
        );

        lot.amount -= amount;
        if lot.amount == TokenAmountU64(0) {
            auction.lot = None;
        }

        Ok(Payout {
            token,
            amount,
            to: auction.seller,
        })
    }

    /// Close out the full holding of `token` to the seller. Clears the bid
    /// asset registration when `token` is the configured bid asset.
    pub fn remove_asset(
        &mut self,
        id: AuctionId,
        sender: &Address,
        token: Token,
    ) -> Result<Option<Payout>, CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::New,
            CustomContractError::InvalidAuctionState
        );

        // No escrow is held in the bid asset before commit.
        if auction.bid_asset.as_ref() == Some(&token) {
            auction.bid_asset = None;
            auction.min_bid = TokenAmountU64(0);
            return Ok(None);
        }

        let matches = auction
            .lot
            .as_ref()
            .map_or(false, |lot| lot.token == token);
        ensure!(matches, CustomContractError::LotMismatch);

        Ok(auction.lot.take().map(|lot| Payout {
            token: lot.token,
            amount: lot.amount,
            to: auction.seller,
        }))
    }

    /// Freeze the configuration and schedule the bidding window.
    pub fn commit(
        &mut self,
        id: AuctionId,
        sender: &Address,
        window: BiddingWindow,
        slot_time: Timestamp,
    ) -> Result<(), CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::New,
            CustomContractError::InvalidAuctionState
        );
        ensure!(
            auction.bid_asset.is_some(),
            CustomContractError::BidAssetNotSet
        );
        ensure!(
            auction.lot.is_some(),
            CustomContractError::InvalidAuctionState
        );
        ensure!(
            window.start >= slot_time && window.start < window.end,
            CustomContractError::InvalidBiddingWindow
        );

        auction.window = Some(window);
        auction.status = AuctionStatus::Committed;

        Ok(())
    }

    /// Cancel an uncommitted instance, returning the lot to the seller.
    pub fn cancel(
        &mut self,
        id: AuctionId,
        sender: &Address,
    ) -> Result<CancelOutcome, CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);

        match auction.status {
            AuctionStatus::New => {
                let payout = auction.lot.take().map(|lot| Payout {
                    token: lot.token,
                    amount: lot.amount,
                    to: auction.seller,
                });
                auction.status = AuctionStatus::Cancelled;
                Ok(CancelOutcome::Cancelled(payout))
            }
            AuctionStatus::Cancelled => Ok(CancelOutcome::AlreadyCancelled),
            _ => Err(CustomContractError::InvalidAuctionState),
        }
    }

    /// Record a bid arriving as a bid-asset transfer. Returns the superseded
    /// bid that must be refunded, if any.
    pub fn bid(
        &mut self,
        id: AuctionId,
        token: Token,
        bidder: AccountAddress,
        amount: ContractTokenAmount,
        slot_time: Timestamp,
    ) -> Result<Option<Payout>, CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        let bid_asset = auction
            .bid_asset
            .clone()
            .ok_or(CustomContractError::BidAssetNotSet)?;
        ensure_eq!(bid_asset, token, CustomContractError::BidAssetMismatch);
        ensure!(
            auction.is_bidding_open(slot_time),
            CustomContractError::BiddingClosed
        );

        // A bid must strictly exceed both the minimum bid and the current
        // highest bid.
        let threshold = if auction.highest_bid > auction.min_bid {
            auction.highest_bid
        } else {
            auction.min_bid
        };
        ensure!(amount > threshold, CustomContractError::BidTooLow);

        let previous = auction.highest_bidder.replace(bidder);
        let refund = previous.map(|account| Payout {
            token: bid_asset,
            amount: auction.highest_bid,
            to: account,
        });
        auction.highest_bid = amount;
        auction.bid_escrow = amount;

        Ok(refund)
    }

    /// Accept the winning bid once the window has ended. Status flip only;
    /// settlement is a separate step open to anyone.
    pub fn accept_bid(
        &mut self,
        id: AuctionId,
        sender: &Address,
        slot_time: Timestamp,
    ) -> Result<(AccountAddress, ContractTokenAmount), CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        ensure!(auction.is_seller(sender), CustomContractError::Unauthorized);
        ensure_eq!(
            auction.status,
            AuctionStatus::Committed,
            CustomContractError::InvalidAuctionState
        );
        ensure!(
            auction.is_ended(slot_time),
            CustomContractError::AuctionStillActive
        );
        let winner = auction
            .highest_bidder
            .ok_or(CustomContractError::InvalidAuctionState)?;

        auction.status = AuctionStatus::BidAccepted;

        Ok((winner, auction.highest_bid))
    }

    /// Close one escrowed holding out of the instance. The step that releases
    /// the last holding flips the status to `Finalized`.
    pub fn finalize(
        &mut self,
        id: AuctionId,
        asset: Token,
        close_to: AccountAddress,
        slot_time: Timestamp,
    ) -> Result<Settlement, CustomContractError> {
        let mut entry = self
            .auctions
            .get_mut(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        let auction = entry.get_mut();

        let payout = match auction.status {
            // Sold: the winning bid goes to the seller, the lot goes to the
            // winning bidder. Any other pairing is rejected.
            AuctionStatus::BidAccepted => {
                let bid_asset = auction
                    .bid_asset
                    .clone()
                    .ok_or(CustomContractError::BidAssetNotSet)?;
                if asset == bid_asset {
                    ensure_eq!(
                        close_to,
                        auction.seller,
                        CustomContractError::Unauthorized
                    );
                    ensure!(
                        auction.bid_escrow > TokenAmountU64(0),
                        CustomContractError::LotMismatch
                    );
                    let amount = auction.bid_escrow;
                    auction.bid_escrow = TokenAmountU64(0);
                    Payout {
                        token: bid_asset,
                        amount,
                        to: close_to,
                    }
                } else {
                    let winner = auction
                        .highest_bidder
                        .ok_or(CustomContractError::InvalidAuctionState)?;
                    ensure_eq!(close_to, winner, CustomContractError::Unauthorized);
                    let matches = auction
                        .lot
                        .as_ref()
                        .map_or(false, |lot| lot.token == asset);
                    ensure!(matches, CustomContractError::LotMismatch);
                    let lot = auction
                        .lot
                        .take()
                        .ok_or(CustomContractError::LotMismatch)?;
                    Payout {
                        token: lot.token,
                        amount: lot.amount,
                        to: close_to,
                    }
                }
            }
            // Expiry path: the window passed without bids, the lot returns to
            // the seller. A committed instance with bids must go through
            // `accept_bid` first.
            AuctionStatus::Committed => {
                ensure!(
                    auction.is_ended(slot_time),
                    CustomContractError::AuctionStillActive
                );
                ensure!(
                    auction.highest_bid == TokenAmountU64(0),
                    CustomContractError::InvalidAuctionState
                );
                ensure_eq!(close_to, auction.seller, CustomContractError::Unauthorized);
                let matches = auction
                    .lot
                    .as_ref()
                    .map_or(false, |lot| lot.token == asset);
                ensure!(matches, CustomContractError::LotMismatch);
                let lot = auction
                    .lot
                    .take()
                    .ok_or(CustomContractError::LotMismatch)?;
                Payout {
                    token: lot.token,
                    amount: lot.amount,
                    to: close_to,
                }
            }
            _ => return Err(CustomContractError::InvalidAuctionState),
        };

        let finalized = auction.lot.is_none() && auction.bid_escrow == TokenAmountU64(0);
        if finalized {
            auction.status = AuctionStatus::Finalized;
        }

        Ok(Settlement { payout, finalized })
    }

    /// Drop a terminal instance record, releasing its reserve into the
    /// treasury. Returns the released amount.
    pub fn delete_finalized_auction(
        &mut self,
        id: AuctionId,
    ) -> Result<Amount, CustomContractError> {
        {
            let auction = self
                .auctions
                .get(&id)
                .ok_or(CustomContractError::UnknownAuction)?;
            ensure!(
                matches!(
                    auction.status,
                    AuctionStatus::Finalized | AuctionStatus::Cancelled
                ),
                CustomContractError::InvalidAuctionState
            );
        }

        let auction = self
            .auctions
            .remove_and_get(&id)
            .ok_or(CustomContractError::UnknownAuction)?;
        self.reserved -= auction.reserve;

        Ok(auction.reserve)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis2::TokenIdVec;
    use concordium_std::test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0; 32]);
    const SELLER: AccountAddress = AccountAddress([1; 32]);
    const BIDDER_A: AccountAddress = AccountAddress([2; 32]);
    const BIDDER_B: AccountAddress = AccountAddress([3; 32]);
    const INTRUDER: AccountAddress = AccountAddress([9; 32]);

    const ASSET_CONTRACT: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const BID_CONTRACT: ContractAddress = ContractAddress {
        index: 11,
        subindex: 0,
    };

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

    fn ts(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn window() -> BiddingWindow {
        BiddingWindow {
            start: ts(100),
            end: ts(200),
        }
    }

    fn seller() -> Address {
        Address::Account(SELLER)
    }

    fn fresh_state() -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(
            &mut state_builder,
            OWNER,
            min_balance(),
            Amount::from_micro_ccd(5_000),
        )
    }

    fn state_with_auction() -> (State<TestStateApi>, AuctionId) {
        let mut state = fresh_state();
        let fees = state.creation_fees();
        let id = state
            .create_auction(SELLER, fees)
            .expect_report("Creation should pass");
        (state, id)
    }

    /// Instance with the lot deposited and the bid asset configured.
    fn configured(min_bid: u64) -> (State<TestStateApi>, AuctionId) {
        let (mut state, id) = state_with_auction();
        state
            .deposit(id, lot_token(), SELLER, TokenAmountU64(1))
            .expect_report("Deposit should pass");
        state
            .set_bid_asset(id, &seller(), bid_token(), TokenAmountU64(min_bid))
            .expect_report("Setting bid asset should pass");
        (state, id)
    }

    fn committed(min_bid: u64) -> (State<TestStateApi>, AuctionId) {
        let (mut state, id) = configured(min_bid);
        state
            .commit(id, &seller(), window(), ts(0))
            .expect_report("Commit should pass");
        (state, id)
    }

    #[concordium_test]
    fn test_create_auction_fee_and_reserve() {
        let mut state = fresh_state();
        let fees = state.creation_fees();

        let short = Amount::from_micro_ccd(fees.micro_ccd - 1);
        claim_eq!(
            state.create_auction(SELLER, short),
            Err(CustomContractError::InsufficientFee)
        );
        claim_eq!(state.reserved, Amount::zero());

        claim_eq!(state.create_auction(SELLER, fees), Ok(0));
        claim_eq!(state.create_auction(SELLER, fees), Ok(1));
        claim_eq!(state.reserved, min_balance() + min_balance());

        let auction = state.auction(0).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::New);
        claim_eq!(auction.seller, SELLER);
        claim_eq!(auction.reserve, min_balance());
    }

    #[concordium_test]
    fn test_set_bid_asset_guards() {
        let (mut state, id) = state_with_auction();

        claim_eq!(
            state.set_bid_asset(id, &Address::Account(INTRUDER), bid_token(), TokenAmountU64(10)),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.set_bid_asset(id, &seller(), bid_token(), TokenAmountU64(0)),
            Err(CustomContractError::ZeroAmount)
        );
        claim_eq!(
            state.set_bid_asset(id, &seller(), bid_token(), TokenAmountU64(10)),
            Ok(())
        );

        // Re-setting the same asset updates the minimum bid.
        claim_eq!(
            state.set_bid_asset(id, &seller(), bid_token(), TokenAmountU64(25)),
            Ok(())
        );
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.min_bid, TokenAmountU64(25));

        // Switching to another asset requires removing the current one first.
        claim_eq!(
            state.set_bid_asset(id, &seller(), lot_token(), TokenAmountU64(10)),
            Err(CustomContractError::BidAssetMismatch)
        );
        let removed = state
            .remove_asset(id, &seller(), bid_token())
            .expect_report("Removing bid asset should pass");
        claim!(removed.is_none());
        claim_eq!(
            state.set_bid_asset(id, &seller(), lot_token(), TokenAmountU64(10)),
            Ok(())
        );
    }

    #[concordium_test]
    fn test_set_bid_asset_rejects_lot_collision() {
        let (mut state, id) = state_with_auction();
        state
            .deposit(id, lot_token(), SELLER, TokenAmountU64(1))
            .expect_report("Deposit should pass");

        claim_eq!(
            state.set_bid_asset(id, &seller(), lot_token(), TokenAmountU64(10)),
            Err(CustomContractError::BidAssetMismatch)
        );
    }

    #[concordium_test]
    fn test_deposit_guards() {
        let (mut state, id) = configured(10);

        claim_eq!(
            state.deposit(id, lot_token(), INTRUDER, TokenAmountU64(1)),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.deposit(id, bid_token(), SELLER, TokenAmountU64(1)),
            Err(CustomContractError::BidAssetMismatch)
        );

        let other = Token {
            contract: ASSET_CONTRACT,
            id: TokenIdVec(vec![99]),
        };
        claim_eq!(
            state.deposit(id, other, SELLER, TokenAmountU64(1)),
            Err(CustomContractError::LotMismatch)
        );

        // Same token accumulates.
        claim_eq!(state.deposit(id, lot_token(), SELLER, TokenAmountU64(4)), Ok(()));
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(
            auction.lot,
            Some(Lot {
                token: lot_token(),
                amount: TokenAmountU64(5),
            })
        );

        state
            .commit(id, &seller(), window(), ts(0))
            .expect_report("Commit should pass");
        claim_eq!(
            state.deposit(id, lot_token(), SELLER, TokenAmountU64(1)),
            Err(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_withdraw_asset() {
        let (mut state, id) = state_with_auction();
        state
            .deposit(id, lot_token(), SELLER, TokenAmountU64(5))
            .expect_report("Deposit should pass");

        claim_eq!(
            state.withdraw_asset(id, &seller(), lot_token(), TokenAmountU64(0)),
            Err(CustomContractError::ZeroAmount)
        );
        claim_eq!(
            state.withdraw_asset(id, &seller(), lot_token(), TokenAmountU64(10)),
            Err(CustomContractError::InsufficientBalance)
        );

        let payout = state
            .withdraw_asset(id, &seller(), lot_token(), TokenAmountU64(2))
            .expect_report("Withdrawal should pass");
        claim_eq!(payout.to, SELLER);
        claim_eq!(payout.amount, TokenAmountU64(2));

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(
            auction.lot,
            Some(Lot {
                token: lot_token(),
                amount: TokenAmountU64(3),
            })
        );

        // Withdrawing the rest removes the holding entirely.
        let payout = state
            .withdraw_asset(id, &seller(), lot_token(), TokenAmountU64(3))
            .expect_report("Withdrawal should pass");
        claim_eq!(payout.amount, TokenAmountU64(3));
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.lot, None);

        claim_eq!(
            state.withdraw_asset(id, &seller(), lot_token(), TokenAmountU64(1)),
            Err(CustomContractError::LotMismatch)
        );
    }

    #[concordium_test]
    fn test_remove_asset_returns_lot() {
        let (mut state, id) = configured(10);

        let payout = state
            .remove_asset(id, &seller(), lot_token())
            .expect_report("Removal should pass")
            .expect_report("Lot payout expected");
        claim_eq!(payout.to, SELLER);
        claim_eq!(payout.amount, TokenAmountU64(1));

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.lot, None);

        // The bid asset registration is cleared without a payout.
        claim!(state
            .remove_asset(id, &seller(), bid_token())
            .expect_report("Removal should pass")
            .is_none());
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.bid_asset, None);
        claim_eq!(auction.min_bid, TokenAmountU64(0));
    }

    #[concordium_test]
    fn test_commit_guards() {
        let (mut state, id) = state_with_auction();

        claim_eq!(
            state.commit(id, &seller(), window(), ts(0)),
            Err(CustomContractError::BidAssetNotSet)
        );

        state
            .set_bid_asset(id, &seller(), bid_token(), TokenAmountU64(10))
            .expect_report("Setting bid asset should pass");
        claim_eq!(
            state.commit(id, &seller(), window(), ts(0)),
            Err(CustomContractError::InvalidAuctionState)
        );

        state
            .deposit(id, lot_token(), SELLER, TokenAmountU64(1))
            .expect_report("Deposit should pass");

        claim_eq!(
            state.commit(id, &Address::Account(INTRUDER), window(), ts(0)),
            Err(CustomContractError::Unauthorized)
        );
        // The window must lie in the future and be non-empty.
        claim_eq!(
            state.commit(
                id,
                &seller(),
                BiddingWindow {
                    start: ts(200),
                    end: ts(100),
                },
                ts(0)
            ),
            Err(CustomContractError::InvalidBiddingWindow)
        );
        claim_eq!(
            state.commit(id, &seller(), window(), ts(150)),
            Err(CustomContractError::InvalidBiddingWindow)
        );

        claim_eq!(state.commit(id, &seller(), window(), ts(0)), Ok(()));
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::Committed);
        claim_eq!(auction.window, Some(window()));

        claim_eq!(
            state.commit(id, &seller(), window(), ts(0)),
            Err(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_cancel() {
        let (mut state, id) = configured(10);

        claim_eq!(
            state.cancel(id, &Address::Account(INTRUDER)).err(),
            Some(CustomContractError::Unauthorized)
        );

        match state.cancel(id, &seller()).expect_report("Cancel should pass") {
            CancelOutcome::Cancelled(Some(payout)) => {
                claim_eq!(payout.to, SELLER);
                claim_eq!(payout.token, lot_token());
            }
            _ => fail!("Expected cancellation with a lot refund"),
        }

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::Cancelled);
        claim_eq!(auction.lot, None);

        // Repeated cancel is a no-op.
        match state.cancel(id, &seller()).expect_report("Cancel should pass") {
            CancelOutcome::AlreadyCancelled => (),
            _ => fail!("Expected cancel no-op"),
        }
    }

    #[concordium_test]
    fn test_cancel_rejected_after_commit() {
        let (mut state, id) = committed(10);

        claim_eq!(
            state.cancel(id, &seller()).err(),
            Some(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_bid_window_and_threshold() {
        let (mut state, id) = committed(10);

        // Outside the window.
        claim_eq!(
            state.bid(id, bid_token(), BIDDER_A, TokenAmountU64(15), ts(50)),
            Err(CustomContractError::BiddingClosed)
        );
        claim_eq!(
            state.bid(id, bid_token(), BIDDER_A, TokenAmountU64(15), ts(200)),
            Err(CustomContractError::BiddingClosed)
        );

        // Wrong asset.
        claim_eq!(
            state.bid(id, lot_token(), BIDDER_A, TokenAmountU64(15), ts(150)),
            Err(CustomContractError::BidAssetMismatch)
        );

        // A first bid equal to the minimum bid does not strictly exceed it.
        claim_eq!(
            state.bid(id, bid_token(), BIDDER_A, TokenAmountU64(10), ts(150)),
            Err(CustomContractError::BidTooLow)
        );
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.highest_bid, TokenAmountU64(0));
        claim_eq!(auction.highest_bidder, None);

        // First accepted bid; nothing to refund.
        claim_eq!(
            state.bid(id, bid_token(), BIDDER_A, TokenAmountU64(15), ts(150)),
            Ok(None)
        );
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.highest_bid, TokenAmountU64(15));
        claim_eq!(auction.highest_bidder, Some(BIDDER_A));
        claim_eq!(auction.bid_escrow, TokenAmountU64(15));

        // Matching the highest bid is not enough.
        claim_eq!(
            state.bid(id, bid_token(), BIDDER_B, TokenAmountU64(15), ts(150)),
            Err(CustomContractError::BidTooLow)
        );
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.highest_bidder, Some(BIDDER_A));

        // A higher bid supersedes and refunds the previous one.
        let refund = state
            .bid(id, bid_token(), BIDDER_B, TokenAmountU64(20), ts(150))
            .expect_report("Bid should pass")
            .expect_report("Refund expected");
        claim_eq!(refund.to, BIDDER_A);
        claim_eq!(refund.amount, TokenAmountU64(15));
        claim_eq!(refund.token, bid_token());

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.highest_bid, TokenAmountU64(20));
        claim_eq!(auction.highest_bidder, Some(BIDDER_B));
        claim_eq!(auction.bid_escrow, TokenAmountU64(20));
    }

    #[concordium_test]
    fn test_bid_unknown_auction() {
        let mut state = fresh_state();
        claim_eq!(
            state.bid(77, bid_token(), BIDDER_A, TokenAmountU64(15), ts(150)),
            Err(CustomContractError::UnknownAuction)
        );
    }

    #[concordium_test]
    fn test_accept_bid_guards() {
        let (mut state, id) = committed(10);
        state
            .bid(id, bid_token(), BIDDER_A, TokenAmountU64(15), ts(150))
            .expect_report("Bid should pass");

        // Not before the window has ended.
        claim_eq!(
            state.accept_bid(id, &seller(), ts(150)).err(),
            Some(CustomContractError::AuctionStillActive)
        );
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::Committed);

        claim_eq!(
            state.accept_bid(id, &Address::Account(INTRUDER), ts(250)).err(),
            Some(CustomContractError::Unauthorized)
        );

        let (winner, amount) = state
            .accept_bid(id, &seller(), ts(250))
            .expect_report("Acceptance should pass");
        claim_eq!(winner, BIDDER_A);
        claim_eq!(amount, TokenAmountU64(15));
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::BidAccepted);

        claim_eq!(
            state.accept_bid(id, &seller(), ts(250)).err(),
            Some(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_accept_bid_requires_a_bid() {
        let (mut state, id) = committed(10);

        claim_eq!(
            state.accept_bid(id, &seller(), ts(250)).err(),
            Some(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_finalize_sold_settles_in_two_steps() {
        let (mut state, id) = committed(10);
        state
            .bid(id, bid_token(), BIDDER_B, TokenAmountU64(20), ts(150))
            .expect_report("Bid should pass");
        state
            .accept_bid(id, &seller(), ts(250))
            .expect_report("Acceptance should pass");

        // Bid escrow to the seller.
        let settlement = state
            .finalize(id, bid_token(), SELLER, ts(250))
            .expect_report("Settlement should pass");
        claim_eq!(settlement.payout.to, SELLER);
        claim_eq!(settlement.payout.amount, TokenAmountU64(20));
        claim!(!settlement.finalized);
        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::BidAccepted);

        // Lot to the winning bidder; this releases the last holding.
        let settlement = state
            .finalize(id, lot_token(), BIDDER_B, ts(250))
            .expect_report("Settlement should pass");
        claim_eq!(settlement.payout.to, BIDDER_B);
        claim_eq!(settlement.payout.amount, TokenAmountU64(1));
        claim!(settlement.finalized);

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::Finalized);
        claim!(auction.is_sold());

        claim_eq!(
            state.finalize(id, lot_token(), BIDDER_B, ts(250)).err(),
            Some(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_finalize_sold_pairing_guards() {
        let (mut state, id) = committed(10);
        state
            .bid(id, bid_token(), BIDDER_B, TokenAmountU64(20), ts(150))
            .expect_report("Bid should pass");
        state
            .accept_bid(id, &seller(), ts(250))
            .expect_report("Acceptance should pass");

        // The bid escrow may only close to the seller, the lot only to the
        // winning bidder.
        claim_eq!(
            state.finalize(id, bid_token(), BIDDER_B, ts(250)).err(),
            Some(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.finalize(id, lot_token(), SELLER, ts(250)).err(),
            Some(CustomContractError::Unauthorized)
        );

        let bogus = Token {
            contract: ASSET_CONTRACT,
            id: TokenIdVec(vec![42]),
        };
        claim_eq!(
            state.finalize(id, bogus, BIDDER_B, ts(250)).err(),
            Some(CustomContractError::LotMismatch)
        );

        // Nothing was moved by the rejected calls.
        let auction = state.auction(id).expect_report("Instance should exist");
        claim!(auction.lot.is_some());
        claim_eq!(auction.bid_escrow, TokenAmountU64(20));
        claim_eq!(auction.status, AuctionStatus::BidAccepted);
    }

    #[concordium_test]
    fn test_finalize_expiry_returns_lot_to_seller() {
        let (mut state, id) = committed(10);

        claim_eq!(
            state.finalize(id, lot_token(), SELLER, ts(150)).err(),
            Some(CustomContractError::AuctionStillActive)
        );
        claim_eq!(
            state.finalize(id, lot_token(), INTRUDER, ts(250)).err(),
            Some(CustomContractError::Unauthorized)
        );

        let settlement = state
            .finalize(id, lot_token(), SELLER, ts(250))
            .expect_report("Settlement should pass");
        claim_eq!(settlement.payout.to, SELLER);
        claim!(settlement.finalized);

        let auction = state.auction(id).expect_report("Instance should exist");
        claim_eq!(auction.status, AuctionStatus::Finalized);
        claim!(!auction.is_sold());
    }

    #[concordium_test]
    fn test_finalize_committed_with_bid_requires_acceptance() {
        let (mut state, id) = committed(10);
        state
            .bid(id, bid_token(), BIDDER_A, TokenAmountU64(15), ts(150))
            .expect_report("Bid should pass");

        claim_eq!(
            state.finalize(id, lot_token(), SELLER, ts(250)).err(),
            Some(CustomContractError::InvalidAuctionState)
        );
    }

    #[concordium_test]
    fn test_delete_finalized_auction() {
        let (mut state, id) = committed(10);

        claim_eq!(
            state.delete_finalized_auction(id),
            Err(CustomContractError::InvalidAuctionState)
        );

        state
            .finalize(id, lot_token(), SELLER, ts(250))
            .expect_report("Settlement should pass");

        let reserved_before = state.reserved;
        claim_eq!(state.delete_finalized_auction(id), Ok(min_balance()));
        claim_eq!(state.reserved, reserved_before - min_balance());

        claim_eq!(
            state.delete_finalized_auction(id),
            Err(CustomContractError::UnknownAuction)
        );
        claim_eq!(
            state.auction(id).err(),
            Some(CustomContractError::UnknownAuction)
        );
    }

    #[concordium_test]
    fn test_delete_cancelled_auction() {
        let (mut state, id) = configured(10);
        state
            .cancel(id, &seller())
            .expect_report("Cancel should pass");

        claim_eq!(state.delete_finalized_auction(id), Ok(min_balance()));
        claim_eq!(state.reserved, Amount::zero());
    }

    #[concordium_test]
    fn test_treasury_accounting() {
        let (mut state, id) = configured(10);
        let fees = state.creation_fees();

        // The creation payment sits in the balance; only the flat fee part is
        // withdrawable while the instance lives.
        claim_eq!(state.treasury(fees), Amount::from_micro_ccd(5_000));

        state
            .cancel(id, &seller())
            .expect_report("Cancel should pass");
        state
            .delete_finalized_auction(id)
            .expect_report("Deletion should pass");

        claim_eq!(state.treasury(fees), fees);
    }
}
