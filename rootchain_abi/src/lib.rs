//! Calls into the Plasma root chain contract.
//!
//! An [`Interface`] is built once from the contract's interface description
//! (the `abi` array emitted by the Solidity compiler, alone or inside its
//! combined JSON output) and maps function names to their [`Entry`]. Each
//! entry knows its canonical signature and selector and encodes a list of
//! [`Token`]s into call data laid out the way the EVM contract ABI expects.
//!
//! ```
//! use rootchain_abi::{Interface, Token};
//!
//! let interface = Interface::from_json_str(
//!     r#"[{"type":"function","name":"coins","inputs":[{"name":"slot","type":"uint256"}]}]"#,
//! )
//! .unwrap();
//! let coins = interface.function("coins").unwrap();
//! assert_eq!(coins.full_signature(), "coins(uint256)");
//!
//! let data = interface.encode_call("coins", &[Token::from(0u64)]).unwrap();
//! assert_eq!(data.len(), 4 + 32);
//! assert_eq!(interface.decode_call(&data).unwrap().1, vec![Token::from(0u64)]);
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod interface;
pub mod param_type;
pub mod signature;
pub mod token;

pub use error::{AbiError, AbiResult};
pub use interface::{Entry, EntryKind, Interface, Param, CONSTRUCTOR_KEY};
pub use param_type::ParamType;
pub use signature::Selector;
pub use token::Token;
