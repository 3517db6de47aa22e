//! The sample domain bundled with the CLI.
//!
//! Users and orders with their DTOs. Rules come from three places:
//! the [`UserModule`] module, the [`OrderRegistrar`] registrar and the
//! `MapFrom` closings of [`OrderCard`], the last two linked into the
//! `sample` assembly. `Invoice` and `InvoiceDto` are known by name but have
//! no rule, so a manifest that precompiles them fails.

// Only the mapper constructs most of these.
#![allow(dead_code)]

use mapweave_build::{MapFrom, Module, Register, TypeCatalog};
use mapweave_core::{ConfigError, MapConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: u64,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u64,
    pub customer: User,
    pub lines: Vec<OrderLine>,
}

impl Order {
    fn total_cents(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity) * line.unit_price_cents)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDto {
    pub id: u64,
    pub customer: String,
    pub total_cents: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderCard {
    pub title: String,
}

pub struct Invoice;
pub struct InvoiceDto;

/// User rules: `User -> UserDto`, `UserDto -> UserSummary`, and
/// `User -> UserSummary` through `UserDto`.
#[derive(Default)]
pub struct UserModule;

impl Module for UserModule {
    fn name(&self) -> &str {
        "users"
    }

    fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
        config.register(|user: &User| UserDto {
            id: user.id,
            full_name: format!("{} {}", user.first_name, user.last_name),
            email: user.email.clone(),
        })?;
        config.register(|dto: &UserDto| UserSummary {
            display: format!("{} <{}>", dto.full_name, dto.email),
        })?;
        config.register_via::<User, UserDto, UserSummary>()
    }
}

#[derive(Default)]
pub struct OrderRegistrar;

impl Register for OrderRegistrar {
    fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
        config.register(|order: &Order| OrderDto {
            id: order.id,
            customer: format!("{} {}", order.customer.first_name, order.customer.last_name),
            total_cents: order.total_cents(),
        })
    }
}

impl MapFrom<Order> for OrderCard {
    fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
        config.register(|order: &Order| OrderCard {
            title: format!("Order #{} ({} lines)", order.id, order.lines.len()),
        })
    }
}

impl MapFrom<OrderDto> for OrderCard {
    fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
        config.register(|dto: &OrderDto| OrderCard {
            title: format!("Order #{} for {}", dto.id, dto.customer),
        })
    }
}

mapweave_build::register!(OrderRegistrar, assembly = "sample");
mapweave_build::map_from!(Order => OrderCard, assembly = "sample");
mapweave_build::map_from!(OrderDto => OrderCard, assembly = "sample");

/// The modules every sample build starts from.
pub fn modules() -> Vec<Box<dyn Module>> {
    vec![Box::new(UserModule)]
}

/// Every sample type a manifest may name.
pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with::<User>()
        .with::<UserDto>()
        .with::<UserSummary>()
        .with::<Order>()
        .with::<OrderLine>()
        .with::<OrderDto>()
        .with::<OrderCard>()
        .with::<Invoice>()
        .with::<InvoiceDto>()
}
