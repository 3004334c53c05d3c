use commons::{AuctionId, ContractTokenAmount, Token};
use concordium_std::*;

use crate::state::{AuctionStatus, BiddingWindow, Lot};

/// Type of the parameter to the `init` function.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct InitParams {
    /// CCD locked per auction instance while its record exists.
    pub auction_min_balance: Amount,
    /// Flat fee retained by the treasury for every created instance.
    pub creation_fee: Amount,
}

/// Parameter naming a single auction instance. Also used as the additional
/// data attached to CIS-2 transfers targeting the `deposit` and `bid` hooks.
#[derive(Debug, Clone, Copy, Serialize, SchemaType)]
pub struct AuctionParam {
    pub auction: AuctionId,
}

#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct SetBidAssetParams {
    pub auction: AuctionId,
    /// Asset accepted as payment for bids.
    pub bid_asset: Token,
    /// Minimum acceptable bid amount. Must be non-zero.
    pub min_bid: ContractTokenAmount,
}

#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct WithdrawAssetParams {
    pub auction: AuctionId,
    pub token: Token,
    pub amount: ContractTokenAmount,
}

#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct RemoveAssetParams {
    pub auction: AuctionId,
    pub token: Token,
}

#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct CommitParams {
    pub auction: AuctionId,
    pub window: BiddingWindow,
}

#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct FinalizeParams {
    pub auction: AuctionId,
    /// The escrowed holding to close out.
    pub asset: Token,
    /// The account the holding is closed to. Checked against the settlement
    /// pairing rules.
    pub close_to: AccountAddress,
}

#[derive(Debug, Clone, Copy, Serialize, SchemaType)]
pub struct WithdrawParams {
    pub amount: Amount,
}

/// Fee schedule entry to update.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub enum FeeValue {
    AuctionMinBalance(Amount),
    CreationFee(Amount),
}

/// Full view of one auction instance record.
#[derive(Debug, Serialize, SchemaType)]
pub struct AuctionView {
    pub seller: AccountAddress,
    pub status: AuctionStatus,
    pub bid_asset: Option<Token>,
    pub min_bid: ContractTokenAmount,
    pub window: Option<BiddingWindow>,
    pub highest_bid: ContractTokenAmount,
    pub highest_bidder: Option<AccountAddress>,
    pub lot: Option<Lot>,
    pub reserve: Amount,
    pub is_bidding_open: bool,
    pub is_ended: bool,
    pub is_sold: bool,
}
