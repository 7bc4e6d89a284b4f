//! Value Objects for the Bodega Domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object and entity validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must not be negative
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Quantity must be positive
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// SKU must be a non-empty code without whitespace
    #[error("Invalid SKU: {0}")]
    InvalidSku(String),

    /// Order requests must carry at least one line
    #[error("Invalid order request: {0}")]
    InvalidOrderRequest(String),
}

// =============================================================================
// Price
// =============================================================================

/// Price represents a non-negative decimal unit price
///
/// # Invariants
/// - Must be >= 0 (zero is legal for promotional items)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if value < 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < Decimal::ZERO {
            return Err(DomainError::InvalidPrice("Price must not be negative".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Create a zero price
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Quantity represents a positive whole number of units
///
/// Stock and cart lines count discrete units, so this wraps an integer
/// rather than a decimal.
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Create a new Quantity with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidQuantity` if value == 0
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidQuantity("Quantity must be positive".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying unit count
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Get the unit count widened for decimal math
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Sku
// =============================================================================

/// Sku is the merchant-facing stock keeping unit code (e.g., COF-001)
///
/// # Invariants
/// - Non-empty after trimming
/// - No interior whitespace
/// - At most 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    /// Create a Sku from a code string
    ///
    /// # Examples
    /// ```
    /// # use bodega_domain::value_objects::Sku;
    /// let sku = Sku::new("COF-001").unwrap();
    /// assert_eq!(sku.as_str(), "COF-001");
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidSku` if the code is empty, contains
    /// whitespace, or exceeds 64 characters
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::InvalidSku("SKU must be non-empty".to_string()));
        }
        if code.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidSku(format!(
                "SKU must not contain whitespace: {:?}",
                code
            )));
        }
        if code.len() > 64 {
            return Err(DomainError::InvalidSku("SKU must be at most 64 characters".to_string()));
        }
        Ok(Self(code.to_string()))
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
