// src/common/money.rs

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};
use utoipa::ToSchema;

/// Valor monetário com duas casas decimais.
///
/// Na API ele circula como número JSON (ex: `12.50`); no SQLite é gravado
/// como INTEGER em centavos, assim `SUM(total)` continua exato.
/// Todo valor já nasce arredondado a centavos, inclusive o que vem do JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = f64)]
pub struct Money(Decimal);

/// Teto para preços, custos e valores digitados (1.000.000.000,00).
const MAX_INPUT_CENTS: i64 = 100_000_000_000;

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Money(value.round_dp(2))
    }

    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Converte para centavos. Falha apenas se o valor não couber em um i64.
    pub fn to_cents(&self) -> Option<i64> {
        self.0.round_dp(2).checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
    }

    pub fn amount(&self) -> Decimal {
        self.0.round_dp(2)
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Valor aceitável como entrada: entre zero e o teto.
    pub fn is_valid_input(&self) -> bool {
        !self.is_negative() && self.0 <= Decimal::new(MAX_INPUT_CENTS, 2)
    }

    /// Subtotal de uma linha: preço unitário × quantidade.
    /// `None` se o resultado não couber em centavos.
    pub fn checked_times(&self, quantity: i64) -> Option<Money> {
        Money::fitting(self.0.checked_mul(Decimal::from(quantity))?)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Money::fitting(self.0.checked_add(rhs.0)?)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Money::fitting(self.0.checked_sub(rhs.0)?)
    }

    pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Money> {
        values
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    fn fitting(value: Decimal) -> Option<Money> {
        let money = Money::new(value);
        money.to_cents().map(|_| money)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Money::new)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

// ---
// Mapeamento SQLite <-> centavos
// ---

impl Type<Sqlite> for Money {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        let cents = self
            .to_cents()
            .ok_or_else(|| format!("valor monetário fora do intervalo: {}", self.0))?;
        <i64 as Encode<'q, Sqlite>>::encode_by_ref(&cents, buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Money {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let cents = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Money::from_cents(cents))
    }
}
