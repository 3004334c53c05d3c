/// Tag for the auction Created event.
pub const CREATED_TAG: u8 = u8::MAX - 5;

/// Tag for the BidAssetSet event.
pub const BID_ASSET_SET_TAG: u8 = u8::MAX - 6;

/// Tag for the Deposited event.
pub const DEPOSITED_TAG: u8 = u8::MAX - 7;

/// Tag for the Withdrawn event.
pub const WITHDRAWN_TAG: u8 = u8::MAX - 8;

/// Tag for the Committed event.
pub const COMMITTED_TAG: u8 = u8::MAX - 9;

/// Tag for the Bid event.
pub const BID_TAG: u8 = u8::MAX - 10;

/// Tag for the BidAccepted event.
pub const BID_ACCEPTED_TAG: u8 = u8::MAX - 11;

/// Tag for the Payout event.
pub const PAYOUT_TAG: u8 = u8::MAX - 12;

/// Tag for the Finalized event.
pub const FINALIZED_TAG: u8 = u8::MAX - 13;

/// Tag for the Cancelled event.
pub const CANCELLED_TAG: u8 = u8::MAX - 14;

/// Tag for the Deleted event.
pub const DELETED_TAG: u8 = u8::MAX - 15;
