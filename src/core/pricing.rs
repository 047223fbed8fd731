use crate::domain::model::{LineItem, LinePricing, PricingResult};
use crate::utils::error::{BillingError, Result};
use serde::{Deserialize, Serialize};

/// Ventura 營運手續費率 (8%)
pub const FEE_RATE: f64 = 0.08;

/// 稅負反推除數:總值 = (小計 + 手續費) / 0.825
pub const GROSS_UP_DIVISOR: f64 = 0.825;

/// 貨幣捨入到小數點後兩位。加上 epsilon 以抵消二進位浮點誤差
/// (保證 2.675 -> 2.68 而不是 2.67)
pub fn round2(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// 負數輸入處理策略。原系統未驗證負數,此處作為配置決策公開
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NegativePolicy {
    /// 拒絕負數 (InvalidInput)
    #[default]
    Reject,
    /// 負數視為零
    Zero,
}

/// `apply_markup` 的輸出:手續費、稅額與開票總值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Markup {
    pub fee: f64,
    pub total: f64,
    pub taxes: f64,
}

/// 共用的加價原語。兩個入口 (逐行 / 單一基準值) 都經過這裡:
/// 手續費 = 基準值 * 8%,總值 = (基準值 + 手續費) / 0.825,
/// 稅額為捨入後的殘差,不是獨立稅率
pub fn apply_markup(base: f64) -> Markup {
    let fee = round2(base * FEE_RATE);
    let total = round2((base + fee) / GROSS_UP_DIVISOR);
    let taxes = round2(total - base - fee);
    Markup { fee, total, taxes }
}

fn check_quantity(quantity: i64, policy: NegativePolicy) -> Result<i64> {
    if quantity >= 0 {
        return Ok(quantity);
    }
    match policy {
        NegativePolicy::Reject => Err(BillingError::invalid_input(
            "quantity",
            quantity,
            "negative quantity has no billing meaning",
        )),
        NegativePolicy::Zero => Ok(0),
    }
}

fn check_amount(field: &str, amount: f64, policy: NegativePolicy) -> Result<f64> {
    if amount >= 0.0 {
        return Ok(amount);
    }
    match policy {
        NegativePolicy::Reject => Err(BillingError::invalid_input(
            field,
            amount,
            "negative amount has no billing meaning",
        )),
        NegativePolicy::Zero => Ok(0.0),
    }
}

/// 單行報價:小計 = round2(數量 * 單價),再套用加價
pub fn price_line(quantity: i64, unit_price: f64, policy: NegativePolicy) -> Result<LinePricing> {
    let quantity = check_quantity(quantity, policy)?;
    let unit_price = check_amount("unit_price", unit_price, policy)?;

    let subtotal = round2(quantity as f64 * unit_price);
    let markup = apply_markup(subtotal);

    Ok(LinePricing {
        subtotal,
        fee: markup.fee,
        total: markup.total,
    })
}

/// 彙總報價。逐行捨入後才加總:這個順序決定了與既有帳面紀錄的
/// 位元級一致,不可改成整批一次捨入
pub fn price_lines(items: &[LineItem], policy: NegativePolicy) -> Result<PricingResult> {
    let mut subtotal = 0.0;
    let mut fee = 0.0;
    let mut total = 0.0;

    for item in items {
        let line = price_line(item.quantity, item.unit_price, policy)?;
        subtotal += line.subtotal;
        fee += line.fee;
        total += line.total;
    }

    // 稅額 = 總值 - (小計 + 手續費),用未捨入的加總值計算
    let taxes = round2(total - (subtotal + fee));

    Ok(PricingResult {
        subtotal: round2(subtotal),
        fee: round2(fee),
        taxes,
        total: round2(total),
    })
}

/// 單一基準值入口的輸出:正規化後的基準值與其加價
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasePricing {
    pub base: f64,
    pub fee: f64,
    pub total: f64,
    pub taxes: f64,
}

/// 單一基準值入口 (物流基準值計費)。呼叫端持久化回傳的 base
pub fn price_base(base_value: f64, policy: NegativePolicy) -> Result<BasePricing> {
    let base = round2(check_amount("base_value", base_value, policy)?);
    let markup = apply_markup(base);
    Ok(BasePricing {
        base,
        fee: markup.fee,
        total: markup.total,
        taxes: markup.taxes,
    })
}
