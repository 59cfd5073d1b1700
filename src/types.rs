//! Statement model consumed by the CAMT.053 writer.
//!
//! The caller populates these types (typically from an upstream bank-format
//! parser) before conversion begins; the writer only reads them.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A counterparty account referenced by a transaction line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Account identifier, usually an IBAN.
    pub acct_id: String,
}

impl BankAccount {
    /// Create a counterparty account reference.
    pub fn new(acct_id: String) -> Self {
        Self { acct_id }
    }
}

/// One transaction line of a bank statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Transaction amount. The sign decides the debit/credit side;
    /// negative amounts render as "DBIT" entries.
    pub amount: Decimal,

    /// Value date.
    pub date: Option<NaiveDate>,

    /// Booking date as recorded by the bank.
    pub date_user: Option<NaiveDate>,

    /// Statement/bank reference of the transaction.
    pub id: String,

    /// End-to-end reference.
    pub refnum: Option<String>,

    /// Free-text note.
    pub memo: Option<String>,

    /// Counterparty name.
    pub payee: Option<String>,

    /// Counterparty account, if known.
    pub bank_account_to: Option<BankAccount>,
}

/// A bank statement ready to be rendered.
///
/// Transaction lines keep their insertion order; the writer emits one entry
/// per line in exactly this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// BIC of the servicing bank.
    pub bank_id: String,

    /// Account identification.
    pub account_id: String,

    /// Three-letter currency code. Must not be empty.
    pub currency: String,

    /// Start of the statement period (inclusive).
    pub start_date: Option<NaiveDateTime>,

    /// End of the statement period (inclusive).
    pub end_date: Option<NaiveDateTime>,

    /// Balance at the start of the period.
    pub start_balance: Decimal,

    /// Balance at the end of the period.
    pub end_balance: Decimal,

    /// Transaction lines in statement order.
    pub lines: Vec<TransactionLine>,
}

impl Statement {
    /// Create a new statement with basic information.
    pub fn new(bank_id: String, account_id: String, currency: String) -> Self {
        Self {
            bank_id,
            account_id,
            currency,
            start_date: None,
            end_date: None,
            start_balance: Decimal::ZERO,
            end_balance: Decimal::ZERO,
            lines: Vec::new(),
        }
    }

    /// Append a transaction line to the statement.
    pub fn add_line(&mut self, line: TransactionLine) {
        self.lines.push(line);
    }
}
