use commons::{
    AuctionId, ContractTokenAmount, Token, BID_ACCEPTED_TAG, BID_ASSET_SET_TAG, BID_TAG,
    CANCELLED_TAG, COMMITTED_TAG, CREATED_TAG, DELETED_TAG, DEPOSITED_TAG, FINALIZED_TAG,
    PAYOUT_TAG, WITHDRAWN_TAG,
};
use concordium_std::*;

use crate::state::BiddingWindow;

/// Auction instance creation event data.
#[derive(Debug, Serial)]
pub struct CreatedEvent<'a> {
    pub auction: AuctionId,
    pub seller: &'a AccountAddress,
    /// CCD locked for the instance.
    pub reserve: Amount,
}

/// Bid asset configuration event data.
#[derive(Debug, Serial)]
pub struct BidAssetSetEvent<'a> {
    pub auction: AuctionId,
    pub bid_asset: &'a Token,
    pub min_bid: ContractTokenAmount,
}

/// Lot deposit event data.
#[derive(Debug, Serial)]
pub struct DepositedEvent<'a> {
    pub auction: AuctionId,
    pub token: &'a Token,
    pub from: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Pre-commit asset withdrawal event data.
#[derive(Debug, Serial)]
pub struct WithdrawnEvent<'a> {
    pub auction: AuctionId,
    pub token: &'a Token,
    pub to: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Commit event data.
#[derive(Debug, Serial)]
pub struct CommittedEvent {
    pub auction: AuctionId,
    pub window: BiddingWindow,
}

/// Bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    pub auction: AuctionId,
    pub bidder: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Bid acceptance event data.
#[derive(Debug, Serial)]
pub struct BidAcceptedEvent<'a> {
    pub auction: AuctionId,
    pub winner: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Settlement step event data.
#[derive(Debug, Serial)]
pub struct PayoutEvent<'a> {
    pub auction: AuctionId,
    pub token: &'a Token,
    pub to: &'a AccountAddress,
    pub amount: ContractTokenAmount,
}

/// Finalization event data.
#[derive(Debug, Serial)]
pub struct FinalizedEvent {
    pub auction: AuctionId,
}

/// Cancellation event data.
#[derive(Debug, Serial)]
pub struct CancelledEvent {
    pub auction: AuctionId,
}

/// Instance deletion event data.
#[derive(Debug, Serial)]
pub struct DeletedEvent {
    pub auction: AuctionId,
    /// CCD released into the treasury.
    pub reserve: Amount,
}

/// Tagged event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent<'a> {
    Created(CreatedEvent<'a>),
    BidAssetSet(BidAssetSetEvent<'a>),
    Deposited(DepositedEvent<'a>),
    Withdrawn(WithdrawnEvent<'a>),
    Committed(CommittedEvent),
    Bid(BidEvent<'a>),
    BidAccepted(BidAcceptedEvent<'a>),
    Payout(PayoutEvent<'a>),
    Finalized(FinalizedEvent),
    Cancelled(CancelledEvent),
    Deleted(DeletedEvent),
}

impl<'a> AuctionEvent<'a> {
    pub fn created(auction: AuctionId, seller: &'a AccountAddress, reserve: Amount) -> Self {
        Self::Created(CreatedEvent {
            auction,
            seller,
            reserve,
        })
    }

    pub fn bid_asset_set(
        auction: AuctionId,
        bid_asset: &'a Token,
        min_bid: ContractTokenAmount,
    ) -> Self {
        Self::BidAssetSet(BidAssetSetEvent {
            auction,
            bid_asset,
            min_bid,
        })
    }

    pub fn deposited(
        auction: AuctionId,
        token: &'a Token,
        from: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::Deposited(DepositedEvent {
            auction,
            token,
            from,
            amount,
        })
    }

    pub fn withdrawn(
        auction: AuctionId,
        token: &'a Token,
        to: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::Withdrawn(WithdrawnEvent {
            auction,
            token,
            to,
            amount,
        })
    }

    pub fn committed(auction: AuctionId, window: BiddingWindow) -> Self {
        Self::Committed(CommittedEvent { auction, window })
    }

    pub fn bid(
        auction: AuctionId,
        bidder: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::Bid(BidEvent {
            auction,
            bidder,
            amount,
        })
    }

    pub fn bid_accepted(
        auction: AuctionId,
        winner: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::BidAccepted(BidAcceptedEvent {
            auction,
            winner,
            amount,
        })
    }

    pub fn payout(
        auction: AuctionId,
        token: &'a Token,
        to: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::Payout(PayoutEvent {
            auction,
            token,
            to,
            amount,
        })
    }

    pub fn finalized(auction: AuctionId) -> Self {
        Self::Finalized(FinalizedEvent { auction })
    }

    pub fn cancelled(auction: AuctionId) -> Self {
        Self::Cancelled(CancelledEvent { auction })
    }

    pub fn deleted(auction: AuctionId, reserve: Amount) -> Self {
        Self::Deleted(DeletedEvent { auction, reserve })
    }
}

impl<'a> Serial for AuctionEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::Created(event) => {
                out.write_u8(CREATED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::BidAssetSet(event) => {
                out.write_u8(BID_ASSET_SET_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Deposited(event) => {
                out.write_u8(DEPOSITED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Withdrawn(event) => {
                out.write_u8(WITHDRAWN_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Committed(event) => {
                out.write_u8(COMMITTED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            AuctionEvent::BidAccepted(event) => {
                out.write_u8(BID_ACCEPTED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Payout(event) => {
                out.write_u8(PAYOUT_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Finalized(event) => {
                out.write_u8(FINALIZED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Cancelled(event) => {
                out.write_u8(CANCELLED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Deleted(event) => {
                out.write_u8(DELETED_TAG)?;
                event.serial(out)
            }
        }
    }
}
