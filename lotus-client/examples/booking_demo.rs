//! Offline booking core walkthrough
//!
//! Exercises the cart store and pricing without a server: restore the
//! draft from a local snapshot, add lines, attach a voucher and watch
//! totals recompute.
//!
//! Run: cargo run --example booking_demo

use lotus_client::cart::{CartItem, CartStore};
use lotus_client::storage::DraftStorage;
use shared::models::{DiscountType, ItemKind, Voucher};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let dir = std::env::temp_dir().join("lotus-booking-demo");
    std::fs::create_dir_all(&dir)?;
    let storage = Arc::new(DraftStorage::open(dir.join("draft.redb"))?);

    let cart = CartStore::new(storage);
    let restored = cart.draft();
    if !restored.is_empty() {
        println!("Restored draft with {} line(s) from last run", restored.items.len());
        cart.clear();
    }

    cart.add_item(CartItem {
        kind: ItemKind::Menu,
        id: "pho-bo".to_string(),
        name: "Phở bò".to_string(),
        image: None,
        unit_price: 50_000.0,
        quantity: 2,
    });
    cart.add_item(CartItem {
        kind: ItemKind::Combo,
        id: "family-7".to_string(),
        name: "Family Combo 7".to_string(),
        image: None,
        unit_price: 300_000.0,
        quantity: 1,
    });

    let before = cart.totals();
    println!("Subtotal: {:.0}", before.subtotal);

    cart.set_voucher(Some(Voucher {
        id: "v-welcome".to_string(),
        code: "WELCOME10".to_string(),
        discount_type: DiscountType::Percent,
        discount_value: 10.0,
        max_discount_amount: 30_000.0,
        min_order_amount: 100_000.0,
        usage_limit: 0,
        usage_limit_per_user: 0,
    }));

    let after = cart.totals();
    println!("Discount: {:.0} (capped)", after.discount);
    println!("Total:    {:.0}", after.total);

    Ok(())
}
