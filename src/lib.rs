//! CAMT.053 Statement Writer Library
//!
//! A library for rendering bank statements as ISO 20022 CAMT.053
//! (`camt.053.001.02`) XML documents.
//!
//! The statement model is populated by the caller, typically from an
//! upstream bank-format parser; this crate only handles the rendering.
//!
//! # Features
//!
//! - Render a [`Statement`] as a CAMT.053 XML string
//! - Write rendered documents through standard `Write` sinks
//! - Deterministic output via an injectable generation timestamp
//!
//! # Examples
//!
//! ## Rendering a statement to a string
//!
//! ```
//! use camt053_writer::{Camt053Writer, Statement, TransactionLine};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let mut statement = Statement::new("BANKBIC".into(), "ACC001".into(), "EUR".into());
//! statement.add_line(TransactionLine {
//!     amount: Decimal::from_str("-42.00")?,
//!     id: "TX1".into(),
//!     memo: Some("Utility bill".into()),
//!     ..TransactionLine::default()
//! });
//!
//! let xml = Camt053Writer::new().to_xml(&statement)?;
//! assert!(xml.contains("<CdtDbtInd>DBIT</CdtDbtInd>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Writing to a file
//!
//! ```no_run
//! use std::fs::File;
//! use camt053_writer::{Camt053Writer, Statement};
//!
//! let statement = Statement::new("BANKBIC".into(), "ACC001".into(), "EUR".into());
//! let mut file = File::create("statement.xml")?;
//! Camt053Writer::new().write_to(&statement, &mut file)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod camt053_format;

// Re-export commonly used types
pub use camt053_format::{Camt053Writer, ClosingIndicator};
pub use error::{Error, Result};
pub use types::{BankAccount, Statement, TransactionLine};
