//! CAMT.053 (ISO 20022) statement writer.
//!
//! CAMT.053 is an XML-based bank-to-customer account statement format
//! defined by the ISO 20022 standard. This module renders a [`Statement`]
//! as a `camt.053.001.02` document.

use crate::error::{Error, Result};
use crate::types::{Statement, TransactionLine};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const CAMT_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.02";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Source of the sign used for the closing balance's `CdtDbtInd`.
///
/// The default takes both balance indicators from the sign of the opening
/// balance, so a period that ends negative still reports "CRDT" when it
/// opened positive. Use [`ClosingIndicator::ClosingSign`] if the closing
/// indicator should follow the closing balance itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosingIndicator {
    /// Both balance blocks take their indicator from the opening balance's sign.
    #[default]
    OpeningSign,
    /// The closing balance block takes its indicator from its own sign.
    ClosingSign,
}

/// Renders a [`Statement`] as a CAMT.053 XML document.
///
/// The generation timestamp is captured once when the writer is created and
/// reused for every statement it renders; it feeds the `CreDtTm` elements
/// and the date part of `MsgId`. Create a new writer per document if each
/// one should carry its own timestamp.
#[derive(Debug, Clone)]
pub struct Camt053Writer {
    generated_at: NaiveDateTime,
    closing_indicator: ClosingIndicator,
}

impl Camt053Writer {
    /// Create a writer stamped with the current local time.
    pub fn new() -> Self {
        Self::with_generation_time(Local::now().naive_local())
    }

    /// Create a writer with an explicit generation timestamp.
    ///
    /// Useful when output must be reproducible, for example in tests.
    pub fn with_generation_time(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            closing_indicator: ClosingIndicator::default(),
        }
    }

    /// Set the policy for the closing balance's credit/debit indicator.
    pub fn closing_indicator(mut self, policy: ClosingIndicator) -> Self {
        self.closing_indicator = policy;
        self
    }

    /// Render a statement as a CAMT.053 XML string.
    ///
    /// The result starts with an XML declaration followed by a single
    /// `Document` element. Transaction lines are rendered as `Ntry`
    /// elements in statement order.
    ///
    /// # Examples
    ///
    /// ```
    /// use camt053_writer::{Camt053Writer, Statement};
    ///
    /// let statement = Statement::new("BANKBIC".into(), "ACC001".into(), "EUR".into());
    /// let xml = Camt053Writer::new().to_xml(&statement)?;
    /// assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_xml(&self, statement: &Statement) -> Result<String> {
        if statement.currency.is_empty() {
            return Err(Error::MissingField("currency"));
        }
        if statement.bank_id.is_empty() {
            return Err(Error::MissingField("bank_id"));
        }

        tracing::debug!(
            "rendering CAMT.053 statement for account {} with {} lines",
            statement.account_id,
            statement.lines.len()
        );

        let document = self.build_document(statement);
        let xml = quick_xml::se::to_string(&document).map_err(|e| Error::Xml(e.to_string()))?;

        Ok(format!("{}{}", XML_DECLARATION, xml))
    }

    /// Write a rendered statement to any destination implementing `Write`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use camt053_writer::{Camt053Writer, Statement};
    ///
    /// let statement = Statement::new("BANKBIC".into(), "ACC001".into(), "EUR".into());
    /// let mut file = File::create("statement.xml")?;
    /// Camt053Writer::new().write_to(&statement, &mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, statement: &Statement, writer: &mut W) -> Result<()> {
        let xml = self.to_xml(statement)?;
        writer.write_all(xml.as_bytes())?;

        Ok(())
    }

    fn build_document(&self, statement: &Statement) -> DocumentXml {
        DocumentXml {
            xmlns_xsd: XSD_NAMESPACE.to_string(),
            xmlns_xsi: XSI_NAMESPACE.to_string(),
            xmlns: CAMT_NAMESPACE.to_string(),
            bk_to_cstmr_stmt: BankToCustomerStatementXml {
                grp_hdr: GroupHeaderXml {
                    msg_id: format!(
                        "{}-{}-0000000",
                        statement.bank_id,
                        self.generated_at.date().format("%Y-%m-%d")
                    ),
                    cre_dt_tm: format_date_time(&self.generated_at),
                    msg_pgntn: MessagePaginationXml {
                        pg_nb: "1".to_string(),
                        last_pg_ind: "true".to_string(),
                    },
                },
                stmt: self.build_statement(statement),
            },
        }
    }

    fn build_statement(&self, statement: &Statement) -> StatementXml {
        let opening = credit_debit_indicator(statement.start_balance);
        let closing = match self.closing_indicator {
            ClosingIndicator::OpeningSign => opening,
            ClosingIndicator::ClosingSign => credit_debit_indicator(statement.end_balance),
        };

        StatementXml {
            id: "0".to_string(),
            elctrnc_seq_nb: "0".to_string(),
            cre_dt_tm: format_date_time(&self.generated_at),
            acct: AccountXml {
                ccy: statement.currency.clone(),
                svcr: ServicerXml {
                    fin_instn_id: FinancialInstitutionIdXml {
                        bic: statement.bank_id.clone(),
                    },
                },
                id: statement.account_id.clone(),
                tp: "CACC".to_string(),
            },
            fr_to_dt: Self::build_period(statement),
            bal: vec![
                Self::build_balance(
                    statement.start_balance,
                    opening,
                    statement.start_date,
                    &statement.currency,
                ),
                Self::build_balance(
                    statement.end_balance,
                    closing,
                    statement.end_date,
                    &statement.currency,
                ),
            ],
            ntry: statement
                .lines
                .iter()
                .map(|line| Self::build_entry(line, &statement.currency))
                .collect(),
        }
    }

    fn build_period(statement: &Statement) -> Option<PeriodXml> {
        let Some(start) = statement.start_date else {
            if statement.end_date.is_some() {
                tracing::warn!("statement has an end date but no start date, omitting FrToDt");
            }
            return None;
        };

        Some(PeriodXml {
            fr_dt_tm: format_date_time(&start),
            to_dt_tm: statement
                .end_date
                .as_ref()
                .map(format_date_time)
                .unwrap_or_default(),
        })
    }

    fn build_balance(
        amount: Decimal,
        indicator: &str,
        bound: Option<NaiveDateTime>,
        currency: &str,
    ) -> BalanceXml {
        BalanceXml {
            tp: BalanceTypeXml {
                cd_or_prtry: CodeOrProprietaryXml {
                    cd: "PRCD".to_string(),
                },
            },
            amt: AmountXml {
                ccy: currency.to_string(),
                value: format_amount(amount),
            },
            cdt_dbt_ind: indicator.to_string(),
            dt: DateXml {
                dt: bound
                    .map(|bound| format_date_only(&bound.date()))
                    .unwrap_or_default(),
            },
        }
    }

    fn build_entry(line: &TransactionLine, currency: &str) -> EntryXml {
        EntryXml {
            cdt_dbt_ind: credit_debit_indicator(line.amount).to_string(),
            sts: "BOOK".to_string(),
            bookg_dt: line.date_user.map(|date| DateXml {
                dt: format_date_only(&date),
            }),
            val_dt: line.date.map(|date| DateXml {
                dt: format_date_only(&date),
            }),
            acct_svcr_ref: opt_text(&line.id),
            amt: AmountXml {
                ccy: currency.to_string(),
                value: format_amount(line.amount),
            },
            addtl_ntry_inf: line.memo.as_deref().and_then(opt_text),
            ntry_dtls: EntryDetailsXml {
                tx_dtls: TransactionDetailsXml {
                    refs: ReferencesXml {
                        end_to_end_id: line.refnum.as_deref().and_then(opt_text),
                    },
                },
            },
            rltd_pties: Self::build_related_parties(line),
        }
    }

    fn build_related_parties(line: &TransactionLine) -> RelatedPartiesXml {
        let account = PartyAccountXml {
            id: line.bank_account_to.as_ref().map(|account| PartyAccountIdXml {
                iban: opt_text(&account.acct_id),
            }),
            nm: line.payee.as_deref().and_then(opt_text),
        };

        // A debit pays a creditor, a credit is received from a debtor.
        if line.amount < Decimal::ZERO {
            RelatedPartiesXml {
                cdtr_acct: Some(account),
                dbtr_acct: None,
            }
        } else {
            RelatedPartiesXml {
                cdtr_acct: None,
                dbtr_acct: Some(account),
            }
        }
    }
}

impl Default for Camt053Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Statement {
    /// Render this statement as a CAMT.053 XML string.
    ///
    /// Shorthand for rendering with a fresh [`Camt053Writer`].
    pub fn to_camt053(&self) -> Result<String> {
        Camt053Writer::new().to_xml(self)
    }
}

// XML structure definitions
#[derive(Debug, Serialize)]
#[serde(rename = "Document")]
struct DocumentXml {
    #[serde(rename = "@xmlns:xsd")]
    xmlns_xsd: String,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: String,
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "BkToCstmrStmt")]
    bk_to_cstmr_stmt: BankToCustomerStatementXml,
}

#[derive(Debug, Serialize)]
struct BankToCustomerStatementXml {
    #[serde(rename = "GrpHdr")]
    grp_hdr: GroupHeaderXml,
    #[serde(rename = "Stmt")]
    stmt: StatementXml,
}

#[derive(Debug, Serialize)]
struct GroupHeaderXml {
    #[serde(rename = "MsgId")]
    msg_id: String,
    #[serde(rename = "CreDtTm")]
    cre_dt_tm: String,
    #[serde(rename = "MsgPgntn")]
    msg_pgntn: MessagePaginationXml,
}

#[derive(Debug, Serialize)]
struct MessagePaginationXml {
    #[serde(rename = "PgNb")]
    pg_nb: String,
    #[serde(rename = "LastPgInd")]
    last_pg_ind: String,
}

#[derive(Debug, Serialize)]
struct StatementXml {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "ElctrncSeqNb")]
    elctrnc_seq_nb: String,
    #[serde(rename = "CreDtTm")]
    cre_dt_tm: String,
    #[serde(rename = "Acct")]
    acct: AccountXml,
    #[serde(rename = "FrToDt", skip_serializing_if = "Option::is_none")]
    fr_to_dt: Option<PeriodXml>,
    #[serde(rename = "Bal")]
    bal: Vec<BalanceXml>,
    #[serde(rename = "Ntry")]
    ntry: Vec<EntryXml>,
}

#[derive(Debug, Serialize)]
struct AccountXml {
    #[serde(rename = "Ccy")]
    ccy: String,
    #[serde(rename = "Svcr")]
    svcr: ServicerXml,
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Tp")]
    tp: String,
}

#[derive(Debug, Serialize)]
struct ServicerXml {
    #[serde(rename = "FinInstnId")]
    fin_instn_id: FinancialInstitutionIdXml,
}

#[derive(Debug, Serialize)]
struct FinancialInstitutionIdXml {
    #[serde(rename = "BIC")]
    bic: String,
}

#[derive(Debug, Serialize)]
struct PeriodXml {
    #[serde(rename = "FrDtTm")]
    fr_dt_tm: String,
    #[serde(rename = "ToDtTm")]
    to_dt_tm: String,
}

#[derive(Debug, Serialize)]
struct BalanceXml {
    #[serde(rename = "Tp")]
    tp: BalanceTypeXml,
    #[serde(rename = "Amt")]
    amt: AmountXml,
    #[serde(rename = "CdtDbtInd")]
    cdt_dbt_ind: String,
    #[serde(rename = "Dt")]
    dt: DateXml,
}

#[derive(Debug, Serialize)]
struct BalanceTypeXml {
    #[serde(rename = "CdOrPrtry")]
    cd_or_prtry: CodeOrProprietaryXml,
}

#[derive(Debug, Serialize)]
struct CodeOrProprietaryXml {
    #[serde(rename = "Cd")]
    cd: String,
}

#[derive(Debug, Serialize)]
struct AmountXml {
    #[serde(rename = "@Ccy")]
    ccy: String,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Debug, Serialize)]
struct DateXml {
    #[serde(rename = "Dt")]
    dt: String,
}

#[derive(Debug, Serialize)]
struct EntryXml {
    #[serde(rename = "CdtDbtInd")]
    cdt_dbt_ind: String,
    #[serde(rename = "Sts")]
    sts: String,
    #[serde(rename = "BookgDt", skip_serializing_if = "Option::is_none")]
    bookg_dt: Option<DateXml>,
    #[serde(rename = "ValDt", skip_serializing_if = "Option::is_none")]
    val_dt: Option<DateXml>,
    #[serde(rename = "AcctSvcrRef", skip_serializing_if = "Option::is_none")]
    acct_svcr_ref: Option<String>,
    #[serde(rename = "Amt")]
    amt: AmountXml,
    #[serde(rename = "AddtlNtryInf", skip_serializing_if = "Option::is_none")]
    addtl_ntry_inf: Option<String>,
    #[serde(rename = "NtryDtls")]
    ntry_dtls: EntryDetailsXml,
    #[serde(rename = "RltdPties")]
    rltd_pties: RelatedPartiesXml,
}

#[derive(Debug, Serialize)]
struct EntryDetailsXml {
    #[serde(rename = "TxDtls")]
    tx_dtls: TransactionDetailsXml,
}

#[derive(Debug, Serialize)]
struct TransactionDetailsXml {
    #[serde(rename = "Refs")]
    refs: ReferencesXml,
}

#[derive(Debug, Serialize)]
struct ReferencesXml {
    #[serde(rename = "EndToEndId", skip_serializing_if = "Option::is_none")]
    end_to_end_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct RelatedPartiesXml {
    #[serde(rename = "CdtrAcct", skip_serializing_if = "Option::is_none")]
    cdtr_acct: Option<PartyAccountXml>,
    #[serde(rename = "DbtrAcct", skip_serializing_if = "Option::is_none")]
    dbtr_acct: Option<PartyAccountXml>,
}

#[derive(Debug, Serialize)]
struct PartyAccountXml {
    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    id: Option<PartyAccountIdXml>,
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    nm: Option<String>,
}

#[derive(Debug, Serialize)]
struct PartyAccountIdXml {
    #[serde(rename = "IBAN", skip_serializing_if = "Option::is_none")]
    iban: Option<String>,
}

// Helper functions for date, amount and text formatting
fn format_date_only(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_date_time(date_time: &NaiveDateTime) -> String {
    date_time.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Format an amount as an unsigned decimal with exactly two fraction digits.
/// The sign is carried by the surrounding `CdtDbtInd` element instead.
fn format_amount(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{:.2}", rounded)
}

fn opt_text(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn credit_debit_indicator(amount: Decimal) -> &'static str {
    if amount < Decimal::ZERO {
        "DBIT"
    } else {
        "CRDT"
    }
}
