//! 业务规则 (纯函数)
//!
//! - [`money`] - ITBIS 与金额计算 (rust_decimal)
//! - [`numbering`] - 单据编号与 NCF 格式
//! - [`order_flow`] - 配送订单状态机
//! - [`credit`] - 客户信用额度与赊账单规则
//! - [`settlement`] - 赊账单结算为发票
//! - [`reconciliation`] - 每日对账

pub mod credit;
pub mod money;
pub mod numbering;
pub mod order_flow;
pub mod reconciliation;
pub mod settlement;

pub use money::DocumentTotals;
pub use numbering::DocumentKind;
pub use reconciliation::{DayDocuments, reconcile};
pub use settlement::{SettlementPlan, plan_settlement};
