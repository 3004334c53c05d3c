//! Sealed-asset auction house.
//!
//! Sellers escrow a CIS-2 asset with an auction instance, bidders escrow a
//! designated CIS-2 bid asset, and once the bidding window has closed the
//! seller accepts the winning bid and anyone may settle the swap. A registrar
//! layer creates auction instance records against a fee schedule, deletes
//! terminal instances and accounts for a CCD treasury.
#![cfg_attr(not(feature = "std"), no_std)]

mod auction;
mod contract;
mod events;
mod external;
mod state;
mod token;
