use commons::{AuctionId, Authority, ContractTokenAmount, CustomContractError, Token};
use concordium_cis2::TokenAmountU64;
use concordium_std::*;

/// Lifecycle tag of one auction instance.
#[derive(Debug, Clone, Copy, Serialize, SchemaType, PartialEq, Eq)]
pub enum AuctionStatus {
    /// Being configured by the seller. Assets may move in and out freely.
    New,
    /// Settings are frozen and the bidding window is scheduled or running.
    Committed,
    /// The seller accepted the winning bid. Settlement is open to anyone.
    BidAccepted,
    /// Cancelled by the seller before committing. Terminal.
    Cancelled,
    /// All escrowed value has left the instance. Terminal.
    Finalized,
}

/// Bidding window bounds, fixed at commit time.
#[derive(Debug, Clone, Copy, Serialize, SchemaType, PartialEq, Eq)]
pub struct BiddingWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// The escrowed asset holding that is up for sale.
#[derive(Debug, Clone, Serialize, SchemaType, PartialEq, Eq)]
pub struct Lot {
    pub token: Token,
    pub amount: ContractTokenAmount,
}

/// Persistent record of one auction instance.
#[derive(Debug, Clone, Serialize, SchemaType, PartialEq, Eq)]
pub struct AuctionData {
    /// Account that created the instance and configures it.
    pub seller: AccountAddress,
    /// Lifecycle tag.
    pub status: AuctionStatus,
    /// Asset accepted as payment for bids.
    pub bid_asset: Option<Token>,
    /// Minimum acceptable bid amount. Zero until the bid asset is set.
    pub min_bid: ContractTokenAmount,
    /// Bidding window. Present from commit onwards.
    pub window: Option<BiddingWindow>,
    /// Leading bid amount. Zero while no bid has been accepted.
    pub highest_bid: ContractTokenAmount,
    /// Depositor of `highest_bid`.
    pub highest_bidder: Option<AccountAddress>,
    /// Escrowed holding that is up for sale.
    pub lot: Option<Lot>,
    /// Bid-asset amount currently escrowed for this instance.
    pub bid_escrow: ContractTokenAmount,
    /// CCD locked for this instance while its record exists.
    pub reserve: Amount,
}

impl AuctionData {
    pub fn new(seller: AccountAddress, reserve: Amount) -> Self {
        Self {
            seller,
            status: AuctionStatus::New,
            bid_asset: None,
            min_bid: TokenAmountU64(0),
            window: None,
            highest_bid: TokenAmountU64(0),
            highest_bidder: None,
            lot: None,
            bid_escrow: TokenAmountU64(0),
            reserve,
        }
    }

    pub fn is_seller(&self, sender: &Address) -> bool {
        *sender == Address::Account(self.seller)
    }

    /// Whether bids are currently accepted: the instance is committed and the
    /// slot time lies within `[start, end)`.
    pub fn is_bidding_open(&self, slot_time: Timestamp) -> bool {
        match (self.status, self.window) {
            (AuctionStatus::Committed, Some(window)) => {
                slot_time >= window.start && slot_time < window.end
            }
            _ => false,
        }
    }

    /// Whether the bidding phase is over: the window has passed, or the
    /// instance has moved beyond the committed stage.
    pub fn is_ended(&self, slot_time: Timestamp) -> bool {
        match self.status {
            AuctionStatus::New => false,
            AuctionStatus::Committed => match self.window {
                Some(window) => slot_time >= window.end,
                None => false,
            },
            AuctionStatus::BidAccepted | AuctionStatus::Cancelled | AuctionStatus::Finalized => {
                true
            }
        }
    }

    /// Whether the instance settled with a sale.
    pub fn is_sold(&self) -> bool {
        self.status == AuctionStatus::Finalized && self.highest_bid > TokenAmountU64(0)
    }
}

/// The contract state: registrar configuration plus the instance registry.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Contract maintainance rights. Admins manage the fee schedule and the
    /// treasury.
    pub authority: Authority<S>,
    /// CCD locked per auction instance while its record exists.
    pub auction_min_balance: Amount,
    /// Flat fee retained by the treasury for every created instance.
    pub creation_fee: Amount,
    /// Total CCD locked for live instance records.
    pub reserved: Amount,
    /// Identifier handed to the next created instance.
    pub next_auction: AuctionId,
    /// Auction instance records.
    pub auctions: StateMap<AuctionId, AuctionData, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a new state with an empty registry.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        origin: AccountAddress,
        auction_min_balance: Amount,
        creation_fee: Amount,
    ) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            auction_min_balance,
            creation_fee,
            reserved: Amount::zero(),
            next_auction: 0,
            auctions: state_builder.new_map(),
        }
    }

    /// CCD required to create an auction instance, recomputed from the
    /// current fee schedule on every call.
    pub fn creation_fees(&self) -> Amount {
        self.auction_min_balance + self.creation_fee
    }

    /// CCD available for withdrawal: the contract balance that is not locked
    /// as instance reserves.
    pub fn treasury(&self, balance: Amount) -> Amount {
        Amount::from_micro_ccd(balance.micro_ccd.saturating_sub(self.reserved.micro_ccd))
    }

    /// Copy of the instance record, for views.
    pub fn auction(&self, id: AuctionId) -> Result<AuctionData, CustomContractError> {
        self.auctions
            .get(&id)
            .map(|auction| (*auction).clone())
            .ok_or(CustomContractError::UnknownAuction)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const SELLER: AccountAddress = AccountAddress([7; 32]);

    fn ts(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn committed_auction() -> AuctionData {
        let mut auction = AuctionData::new(SELLER, Amount::from_micro_ccd(100));
        auction.status = AuctionStatus::Committed;
        auction.window = Some(BiddingWindow {
            start: ts(100),
            end: ts(200),
        });
        auction
    }

    #[concordium_test]
    fn test_bidding_window_is_half_open() {
        let auction = committed_auction();

        claim!(!auction.is_bidding_open(ts(99)));
        claim!(auction.is_bidding_open(ts(100)));
        claim!(auction.is_bidding_open(ts(199)));
        claim!(!auction.is_bidding_open(ts(200)));

        claim!(!auction.is_ended(ts(199)));
        claim!(auction.is_ended(ts(200)));
    }

    #[concordium_test]
    fn test_new_instance_neither_open_nor_ended() {
        let auction = AuctionData::new(SELLER, Amount::zero());

        claim!(!auction.is_bidding_open(ts(0)));
        claim!(!auction.is_ended(ts(u64::MAX)));
    }

    #[concordium_test]
    fn test_terminal_states_are_ended() {
        let mut auction = committed_auction();
        auction.status = AuctionStatus::BidAccepted;
        claim!(auction.is_ended(ts(0)));

        auction.status = AuctionStatus::Cancelled;
        claim!(auction.is_ended(ts(0)));

        auction.status = AuctionStatus::Finalized;
        claim!(auction.is_ended(ts(0)));
    }

    #[concordium_test]
    fn test_is_sold_requires_finalized_with_bid() {
        let mut auction = committed_auction();
        auction.highest_bid = TokenAmountU64(25);
        claim!(!auction.is_sold());

        auction.status = AuctionStatus::Finalized;
        claim!(auction.is_sold());

        auction.highest_bid = TokenAmountU64(0);
        claim!(!auction.is_sold());
    }
}
