//! Seed data: the storefront's demo catalog, order history and address book.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use duka_commerce::account::{AddressLabel, SavedAddress};
use duka_commerce::catalog::{Product, ProductVariant};
use duka_commerce::ids::{AddressId, OrderId, ProductId, UserId, VariantId};
use duka_commerce::money::Money;
use duka_commerce::order::{Order, OrderAddress, OrderItem, OrderStatus, ShippingInfo};

/// The signed-in demo customer.
pub const DEMO_USER: &str = "1";

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    compare_at: Option<i64>,
    image: &'static str,
    category: &'static str,
    subcategory: Option<&'static str>,
    featured: bool,
    stock: i64,
    sku: &'static str,
    created: DateTime<Utc>,
}

impl Seed {
    fn build(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: Money::kes(self.price),
            compare_at_price: self.compare_at.map(Money::kes),
            images: vec![format!("/images/{}-1.jpg", self.image), format!("/images/{}-2.jpg", self.image)],
            thumbnail: format!("/images/{}-1.jpg", self.image),
            category: self.category.to_string(),
            subcategory: self.subcategory.map(str::to_string),
            featured: self.featured,
            in_stock: self.stock > 0,
            stock_quantity: self.stock,
            sku: self.sku.to_string(),
            attributes: BTreeMap::new(),
            variants: Vec::new(),
            created_at: self.created,
            updated_at: self.created,
        }
    }
}

/// Eight demo products with ids `"1"` to `"8"`.
pub fn products() -> Vec<Product> {
    let mut headphones = Seed {
        id: "1",
        name: "Wireless Bluetooth Headphones",
        description: "Immersive sound with active noise cancellation and 30-hour battery life.",
        price: 9999,
        compare_at: Some(12999),
        image: "headphones",
        category: "Electronics",
        subcategory: Some("Audio"),
        featured: true,
        stock: 45,
        sku: "WBH-001",
        created: at(2023, 1, 15, 9, 0),
    }
    .build();
    headphones.attributes = attrs(&[("brand", "SoundMax"), ("connectivity", "Bluetooth 5.2")]);

    let mut watch = Seed {
        id: "2",
        name: "Smart Fitness Watch",
        description: "Track your heart rate, sleep and workouts with a week of battery life.",
        price: 14999,
        compare_at: None,
        image: "watch",
        category: "Electronics",
        subcategory: Some("Wearables"),
        featured: true,
        stock: 30,
        sku: "SFW-002",
        created: at(2023, 2, 10, 9, 0),
    }
    .build();
    watch.variants = vec![
        ProductVariant {
            id: VariantId::new("2-black"),
            title: "Black".to_string(),
            sku: "SFW-002-BLK".to_string(),
            price: Money::kes(14999),
            compare_at_price: None,
            attributes: attrs(&[("color", "Black")]),
            stock_quantity: 20,
            in_stock: true,
        },
        ProductVariant {
            id: VariantId::new("2-silver"),
            title: "Silver".to_string(),
            sku: "SFW-002-SLV".to_string(),
            price: Money::kes(15999),
            compare_at_price: None,
            attributes: attrs(&[("color", "Silver")]),
            stock_quantity: 10,
            in_stock: true,
        },
    ];

    let mut backpack = Seed {
        id: "3",
        name: "Premium Leather Backpack",
        description: "Handcrafted full-grain leather backpack with a padded laptop sleeve.",
        price: 7999,
        compare_at: Some(9999),
        image: "backpack",
        category: "Accessories",
        subcategory: Some("Bags"),
        featured: true,
        stock: 15,
        sku: "PLB-003",
        created: at(2023, 3, 5, 9, 0),
    }
    .build();
    backpack.attributes = attrs(&[("material", "Leather")]);

    let jacket = Seed {
        id: "4",
        name: "Classic Denim Jacket",
        description: "Timeless denim jacket in a relaxed fit.",
        price: 4999,
        compare_at: None,
        image: "jacket",
        category: "Clothing",
        subcategory: Some("Outerwear"),
        featured: false,
        stock: 25,
        sku: "CDJ-004",
        created: at(2023, 3, 20, 9, 0),
    }
    .build();

    let tv = Seed {
        id: "5",
        name: "Ultra HD Smart TV - 55\"",
        description: "55-inch 4K display with HDR and built-in streaming apps.",
        price: 49999,
        compare_at: Some(59999),
        image: "tv",
        category: "Electronics",
        subcategory: Some("Television"),
        featured: true,
        stock: 8,
        sku: "UHD-005",
        created: at(2023, 4, 1, 9, 0),
    }
    .build();

    let tshirt = Seed {
        id: "6",
        name: "Organic Cotton T-Shirt",
        description: "Soft, breathable everyday tee made from organic cotton.",
        price: 1499,
        compare_at: Some(1999),
        image: "tshirt",
        category: "Clothing",
        subcategory: Some("Tops"),
        featured: false,
        stock: 100,
        sku: "OCT-006",
        created: at(2023, 4, 18, 9, 0),
    }
    .build();

    let bottle = Seed {
        id: "7",
        name: "Stainless Steel Water Bottle",
        description: "Double-walled bottle that keeps drinks cold for 24 hours.",
        price: 1999,
        compare_at: None,
        image: "bottle",
        category: "Home & Kitchen",
        subcategory: None,
        featured: false,
        stock: 0,
        sku: "SSB-007",
        created: at(2023, 5, 2, 9, 0),
    }
    .build();

    let coffee = Seed {
        id: "8",
        name: "Premium Coffee Maker",
        description: "Programmable 12-cup coffee maker with a thermal carafe.",
        price: 12999,
        compare_at: None,
        image: "coffee-maker",
        category: "Home & Kitchen",
        subcategory: Some("Appliances"),
        featured: false,
        stock: 12,
        sku: "PCM-008",
        created: at(2023, 5, 20, 9, 0),
    }
    .build();

    vec![headphones, watch, backpack, jacket, tv, tshirt, bottle, coffee]
}

fn john_doe() -> OrderAddress {
    OrderAddress {
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        address: "123 Main St".to_string(),
        apartment: None,
        city: "Nairobi".to_string(),
        state: "Nairobi County".to_string(),
        zip_code: "00100".to_string(),
        country: "Kenya".to_string(),
        phone: "+254712345678".to_string(),
    }
}

fn item(n: u32, product: &str, name: &str, price: i64, image: &str) -> OrderItem {
    OrderItem {
        id: format!("item-{}", n),
        product_id: ProductId::new(product),
        name: name.to_string(),
        price: Money::kes(price),
        quantity: 1,
        image: format!("/images/{}", image),
    }
}

/// Order history of the demo customer.
pub fn orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::new("ORD-1234-ABCD"),
            user_id: UserId::new(DEMO_USER),
            items: vec![
                item(1, "1", "Wireless Bluetooth Headphones", 9999, "headphones-1.jpg"),
                item(2, "3", "Premium Leather Backpack", 7999, "backpack-1.jpg"),
            ],
            status: OrderStatus::Delivered,
            subtotal: Money::kes(17998),
            shipping: Money::kes(599),
            tax: Money::kes(2880),
            total: Money::kes(21477),
            shipping_address: john_doe(),
            billing_address: john_doe(),
            payment_method: "mpesa".to_string(),
            shipping_info: ShippingInfo {
                method: "Standard Shipping".to_string(),
                carrier: Some("DHL".to_string()),
                tracking_number: Some("DHL1234567890".to_string()),
                estimated_delivery: Some("2023-06-18".to_string()),
                cost: Money::kes(599),
            },
            created_at: at(2023, 6, 15, 10, 30),
            updated_at: at(2023, 6, 15, 14, 20),
        },
        Order {
            id: OrderId::new("ORD-5678-EFGH"),
            user_id: UserId::new(DEMO_USER),
            items: vec![item(3, "5", "Ultra HD Smart TV - 55\"", 49999, "tv-1.jpg")],
            status: OrderStatus::Shipped,
            subtotal: Money::kes(49999),
            shipping: Money::kes(1499),
            tax: Money::kes(8000),
            total: Money::kes(59498),
            shipping_address: john_doe(),
            billing_address: john_doe(),
            payment_method: "credit_card".to_string(),
            shipping_info: ShippingInfo {
                method: "Express Shipping".to_string(),
                carrier: Some("FedEx".to_string()),
                tracking_number: Some("FDX9876543210".to_string()),
                estimated_delivery: Some("2023-06-01".to_string()),
                cost: Money::kes(1499),
            },
            created_at: at(2023, 5, 29, 8, 15),
            updated_at: at(2023, 5, 30, 11, 45),
        },
        Order {
            id: OrderId::new("ORD-9012-IJKL"),
            user_id: UserId::new(DEMO_USER),
            items: vec![
                item(4, "2", "Smart Fitness Watch", 14999, "watch-1.jpg"),
                item(5, "8", "Premium Coffee Maker", 12999, "coffee-maker-1.jpg"),
            ],
            status: OrderStatus::Processing,
            subtotal: Money::kes(27998),
            shipping: Money::kes(599),
            tax: Money::kes(4480),
            total: Money::kes(33077),
            shipping_address: john_doe(),
            billing_address: john_doe(),
            payment_method: "mpesa".to_string(),
            shipping_info: ShippingInfo {
                method: "Standard Shipping".to_string(),
                carrier: Some("Kenya Post".to_string()),
                tracking_number: None,
                estimated_delivery: Some("2023-04-15".to_string()),
                cost: Money::kes(599),
            },
            created_at: at(2023, 4, 10, 15, 45),
            updated_at: at(2023, 4, 11, 9, 30),
        },
    ]
}

/// The demo customer's address book.
pub fn addresses() -> Vec<SavedAddress> {
    vec![
        SavedAddress {
            id: AddressId::new("addr-1"),
            user_id: UserId::new(DEMO_USER),
            is_default: true,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address_line1: "123 Main Street".to_string(),
            address_line2: None,
            city: "Nairobi".to_string(),
            state: "Nairobi County".to_string(),
            postal_code: "00100".to_string(),
            country: "Kenya".to_string(),
            phone_number: "+254712345678".to_string(),
            label: Some(AddressLabel::Home),
        },
        SavedAddress {
            id: AddressId::new("addr-2"),
            user_id: UserId::new(DEMO_USER),
            is_default: false,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address_line1: "456 Work Avenue".to_string(),
            address_line2: Some("Floor 5".to_string()),
            city: "Nairobi".to_string(),
            state: "Nairobi County".to_string(),
            postal_code: "00200".to_string(),
            country: "Kenya".to_string(),
            phone_number: "+254787654321".to_string(),
            label: Some(AddressLabel::Work),
        },
    ]
}
