//! Template context — serializable rendering payload built from domain data.
//!
//! Every display string (amounts, dates, links, fallbacks) is computed here so
//! templates stay free of arithmetic and formatting. Input validation happens
//! here too: a context is only produced from data that passed
//! [`User::validate`] / [`Order::validate`].

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use ordermail_core::format::{format_date, format_date_time, format_inr, NOT_AVAILABLE};
use ordermail_core::{
    DataError, Order, OrderItem, PaymentType, RenderConfig, StatusPresentation, User,
};

use crate::engine::EmailKind;
use crate::error::RenderError;

/// Everything a template can read.
///
/// Sections that do not apply to an email kind are `None` and serialize as
/// `null`, which templates treat as false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailContext {
    /// Slug of the email kind, e.g. `order-confirmation`.
    pub kind: String,
    pub subject: String,
    pub brand: BrandCtx,
    /// Addressee for customer-facing emails.
    pub recipient: Option<ContactCtx>,
    pub order: Option<OrderCtx>,
    pub status: Option<StatusCtx>,
    /// `dd/mm/yyyy` of the render time.
    pub generated_on: String,
}

/// Brand and footer details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandCtx {
    pub name: String,
    pub support_email: Option<String>,
    pub menu_url: String,
    /// Copyright year, taken from the render clock.
    pub year: i32,
}

/// Name and contact details with `N/A` placeholders filled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactCtx {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One rendered item row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCtx {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Order section shared by every order email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCtx {
    pub number: String,
    pub items: Vec<ItemCtx>,
    pub item_count: usize,
    pub subtotal: String,
    /// Present only when the delivery charge is above zero.
    pub delivery_charge: Option<String>,
    pub total: String,
    pub payment_type: PaymentType,
    pub payment_label: String,
    pub advance_paid: String,
    /// Present only when something is still owed at pickup.
    pub remaining: Option<String>,
    /// Caller-supplied settlement flag; drives the invoice banner.
    pub is_fully_paid: bool,
    pub estimated_minutes: u32,
    pub special_instructions: Option<String>,
    pub placed_at: String,
    pub placed_on: String,
    /// Customer details read from the order's nested customer record.
    pub customer: ContactCtx,
    /// Present for emails that link to order tracking.
    pub tracking_url: Option<String>,
}

/// Status section of the status-update email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCtx {
    /// Status keyword as supplied, uppercased.
    pub label: String,
    pub emoji: String,
    pub message: String,
    pub color: String,
    /// False when the fallback presentation was used.
    pub recognized: bool,
}

/// Item rows, in order. The iterator is cheap to clone, so it can be walked
/// again from the start as often as needed. A row whose line total does not
/// fit in a `Decimal` yields `InvalidAmount`.
pub fn item_rows(
    items: &[OrderItem],
) -> impl Iterator<Item = Result<ItemCtx, DataError>> + Clone + '_ {
    items.iter().enumerate().map(|(index, item)| -> Result<ItemCtx, DataError> {
        let line_total = item.line_total().ok_or_else(|| DataError::InvalidAmount {
            field: format!("items[{index}].lineTotal"),
            value: format!("{} x {}", item.price, item.quantity),
        })?;
        Ok(ItemCtx {
            name: item.name.trim().to_string(),
            quantity: item.quantity,
            unit_price: format_inr(item.price),
            line_total: format_inr(line_total),
        })
    })
}

impl ContactCtx {
    fn from_user(user: &User) -> Self {
        ContactCtx {
            name: user.name.trim().to_string(),
            email: user.email().unwrap_or(NOT_AVAILABLE).to_string(),
            phone: user.phone().unwrap_or(NOT_AVAILABLE).to_string(),
        }
    }

    fn from_customer(customer: Option<&User>) -> Self {
        match customer {
            Some(user) => {
                let mut ctx = Self::from_user(user);
                if ctx.name.is_empty() {
                    ctx.name = NOT_AVAILABLE.to_string();
                }
                ctx
            }
            None => ContactCtx {
                name: NOT_AVAILABLE.to_string(),
                email: NOT_AVAILABLE.to_string(),
                phone: NOT_AVAILABLE.to_string(),
            },
        }
    }
}

impl OrderCtx {
    /// Validates `order` and projects it. `with_tracking` additionally
    /// requires a non-blank order id.
    pub fn from_order(
        order: &Order,
        config: &RenderConfig,
        with_tracking: bool,
    ) -> Result<Self, RenderError> {
        order.validate()?;
        let tracking_url = if with_tracking {
            Some(config.tracking_url(order.tracking_id()?))
        } else {
            None
        };
        let offset = config.offset();
        let items = item_rows(&order.items).collect::<Result<Vec<_>, _>>()?;

        Ok(OrderCtx {
            number: order.order_number.0.trim().to_string(),
            item_count: items.len(),
            items,
            subtotal: format_inr(order.subtotal()),
            delivery_charge: order
                .has_delivery_charge()
                .then(|| format_inr(order.delivery_charge)),
            total: format_inr(order.total_amount),
            payment_type: order.payment_type,
            payment_label: order.payment_type.label().to_string(),
            advance_paid: format_inr(order.advance_amount),
            remaining: order
                .has_balance_due()
                .then(|| format_inr(order.remaining_amount)),
            is_fully_paid: order.is_fully_paid,
            estimated_minutes: order.estimated_time,
            special_instructions: order.special_instructions().map(str::to_string),
            placed_at: format_date_time(order.created_at, offset),
            placed_on: format_date(order.created_at, offset),
            customer: ContactCtx::from_customer(order.customer.as_ref()),
            tracking_url,
        })
    }
}

impl StatusCtx {
    pub fn from_keyword(status: &str) -> Self {
        let recognized = StatusPresentation::lookup(status).is_ok();
        let presentation = StatusPresentation::lookup_or_fallback(status);
        StatusCtx {
            label: status.to_uppercase(),
            emoji: presentation.emoji.to_string(),
            message: presentation.message.to_string(),
            color: presentation.color.to_string(),
            recognized,
        }
    }
}

impl EmailContext {
    fn base(kind: EmailKind, subject: String, config: &RenderConfig, now: DateTime<Utc>) -> Self {
        EmailContext {
            kind: kind.slug().to_string(),
            subject,
            brand: BrandCtx {
                name: config.brand_name.clone(),
                support_email: config.support_email.clone(),
                menu_url: config.menu_url(),
                year: now.with_timezone(&config.offset()).year(),
            },
            recipient: None,
            order: None,
            status: None,
            generated_on: format_date(now, config.offset()),
        }
    }

    /// Welcome email for a new account.
    pub fn welcome(
        user: &User,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        user.validate()?;
        let subject = format!("Welcome to {}!", config.brand_name);
        let mut ctx = Self::base(EmailKind::Welcome, subject, config, now);
        ctx.recipient = Some(ContactCtx::from_user(user));
        Ok(ctx)
    }

    /// New-order notification for the kitchen/admin inbox.
    pub fn admin_order(
        order: &Order,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        let order_ctx = OrderCtx::from_order(order, config, false)?;
        let subject = format!("New Order Received - #{}", order_ctx.number);
        let mut ctx = Self::base(EmailKind::AdminOrder, subject, config, now);
        ctx.order = Some(order_ctx);
        Ok(ctx)
    }

    /// Confirmation sent to the customer right after ordering.
    pub fn order_confirmation(
        user: &User,
        order: &Order,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        Self::customer_order(EmailKind::OrderConfirmation, user, order, config, now, true)
    }

    /// Pickup notice once the kitchen marks the order ready.
    pub fn order_ready(
        user: &User,
        order: &Order,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        Self::customer_order(EmailKind::OrderReady, user, order, config, now, true)
    }

    /// Invoice for the customer.
    pub fn invoice(
        user: &User,
        order: &Order,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        Self::customer_order(EmailKind::Invoice, user, order, config, now, false)
    }

    /// Status update. Unknown keywords use the fallback presentation.
    pub fn order_status(
        user: &User,
        order: &Order,
        status: &str,
        config: &RenderConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, RenderError> {
        let status_ctx = StatusCtx::from_keyword(status);
        let mut ctx = Self::customer_order(EmailKind::OrderStatus, user, order, config, now, true)?;
        if !status_ctx.label.trim().is_empty() {
            ctx.subject = format!("{}: {}", ctx.subject, status_ctx.label.trim());
        }
        ctx.status = Some(status_ctx);
        Ok(ctx)
    }

    fn customer_order(
        kind: EmailKind,
        user: &User,
        order: &Order,
        config: &RenderConfig,
        now: DateTime<Utc>,
        with_tracking: bool,
    ) -> Result<Self, RenderError> {
        user.validate()?;
        let order_ctx = OrderCtx::from_order(order, config, with_tracking)?;
        let subject = kind.subject(&config.brand_name, &order_ctx.number);
        let mut ctx = Self::base(kind, subject, config, now);
        ctx.recipient = Some(ContactCtx::from_user(user));
        ctx.order = Some(order_ctx);
        Ok(ctx)
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        let value = serde_json::to_value(self)?;
        tera::Context::from_value(value).map_err(RenderError::from)
    }
}
