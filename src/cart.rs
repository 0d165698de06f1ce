//! Storefront cart and wishlist.
//!
//! The cart is a plain value owned by one browsing session. Persistence is
//! the caller's job: [`Cart::snapshot`] produces what to store per user and
//! [`on_login`] / [`on_logout`] decide which cart the session continues with.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::DateRange;
use crate::error::PricingError;
use crate::pricing::{self, PriceInput, Quote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOwner {
    Guest,
    User(String),
}

/// Catalog data captured when a product is put in the cart or wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub vendor_id: String,
    pub name: String,
    pub image: Option<String>,
    pub daily_price: Decimal,
    pub weekly_price: Option<Decimal>,
    pub deposit: Decimal,
    pub commission_rate: Decimal,
}

impl CartProduct {
    fn same_line(&self, product_id: &str, variant_id: Option<&str>) -> bool {
        self.product_id == product_id && self.variant_id.as_deref() == variant_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: CartProduct,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
}

/// What gets persisted for a signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub wishlist: Vec<CartProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPreview {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub platform_fee: Decimal,
    pub deposit: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub owner: CartOwner,
    items: Vec<CartItem>,
    wishlist: Vec<CartProduct>,
}

impl Cart {
    pub fn guest() -> Self {
        Self {
            owner: CartOwner::Guest,
            items: Vec::new(),
            wishlist: Vec::new(),
        }
    }

    pub fn for_user(user_id: impl Into<String>, snapshot: CartSnapshot) -> Self {
        Self {
            owner: CartOwner::User(user_id.into()),
            items: snapshot.items,
            wishlist: snapshot.wishlist,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn wishlist(&self) -> &[CartProduct] {
        &self.wishlist
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adding the same product/variant again replaces its dates.
    pub fn add(&mut self, item: CartItem) {
        let variant = item.product.variant_id.clone();
        match self.position(&item.product.product_id, variant.as_deref()) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, product_id: &str, variant_id: Option<&str>) -> Option<CartItem> {
        self.position(product_id, variant_id)
            .map(|index| self.items.remove(index))
    }

    /// Moves a cart line to the wishlist. Returns false if it was not in the cart.
    pub fn move_to_wishlist(&mut self, product_id: &str, variant_id: Option<&str>) -> bool {
        let Some(item) = self.remove(product_id, variant_id) else {
            return false;
        };
        if !self.wishlist.iter().any(|p| p.same_line(product_id, variant_id)) {
            self.wishlist.push(item.product);
        }
        true
    }

    /// Moves a wishlist entry into the cart for the given dates. The day
    /// count is taken from the dates, both ends inclusive.
    pub fn move_to_cart(
        &mut self,
        product_id: &str,
        variant_id: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> bool {
        let Some(index) = self
            .wishlist
            .iter()
            .position(|p| p.same_line(product_id, variant_id))
        else {
            return false;
        };
        let product = self.wishlist.remove(index);
        let days = DateRange::new(start_date, end_date).map_or(0, |range| range.days());
        self.add(CartItem {
            product,
            start_date,
            end_date,
            days,
        });
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Prices every line with the same function the order writer uses.
    pub fn preview(&self) -> Result<CartPreview, PricingError> {
        let lines = self
            .items
            .iter()
            .map(|item| {
                let quote = pricing::quote(&PriceInput {
                    daily_price: item.product.daily_price,
                    weekly_price: item.product.weekly_price,
                    days: item.days,
                    commission_rate: item.product.commission_rate,
                    deposit: item.product.deposit,
                })?;
                Ok(CartLine {
                    product_id: item.product.product_id.clone(),
                    variant_id: item.product.variant_id.clone(),
                    quote,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let sum = |f: fn(&Quote) -> Decimal| lines.iter().map(|l| f(&l.quote)).sum::<Decimal>();
        Ok(CartPreview {
            subtotal: sum(|q| q.subtotal),
            platform_fee: sum(|q| q.platform_fee),
            deposit: sum(|q| q.deposit),
            total: sum(|q| q.total),
            lines,
        })
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            wishlist: self.wishlist.clone(),
        }
    }

    fn position(&self, product_id: &str, variant_id: Option<&str>) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.product.same_line(product_id, variant_id))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::guest()
    }
}

/// Cart the session continues with after `user_id` signs in.
///
/// A stored cart always wins. Without one, a guest's cart is adopted by the
/// user; a cart that belonged to a previous user is never carried over.
pub fn on_login(current: Cart, stored: Option<CartSnapshot>, user_id: &str) -> Cart {
    match (stored, current.owner) {
        (Some(snapshot), _) => Cart::for_user(user_id, snapshot),
        (None, CartOwner::Guest) => Cart {
            owner: CartOwner::User(user_id.to_string()),
            items: current.items,
            wishlist: current.wishlist,
        },
        (None, CartOwner::User(_)) => Cart::for_user(user_id, CartSnapshot::default()),
    }
}

/// Signs the session out. Returns the empty guest cart and, for a user
/// cart, what to persist under that user.
pub fn on_logout(current: Cart) -> (Cart, Option<(String, CartSnapshot)>) {
    let saved = match &current.owner {
        CartOwner::User(user_id) => Some((user_id.clone(), current.snapshot())),
        CartOwner::Guest => None,
    };
    (Cart::guest(), saved)
}
