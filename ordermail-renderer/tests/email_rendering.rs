use chrono::{TimeZone, Utc};
use ordermail_core::{
    DataError, FixedClock, Order, OrderId, OrderItem, OrderNumber, PaymentType, RenderConfig,
    User,
};
use ordermail_renderer::{EmailKind, EmailPayload, RenderError, Renderer, TemplateEngine};
use rstest::rstest;
use rust_decimal::Decimal;
use tempfile::TempDir;

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 10, 17, 6, 0, 0).unwrap())
}

fn config() -> RenderConfig {
    RenderConfig::new("https://example.com").expect("config")
}

fn renderer() -> Renderer {
    Renderer::new(config()).expect("renderer").with_clock(clock())
}

fn user() -> User {
    User {
        name: "Asha Menon".to_string(),
        email: Some("asha@example.com".to_string()),
        phone: None,
    }
}

fn item(name: &str, price: i64, quantity: u32) -> OrderItem {
    OrderItem { name: name.to_string(), price: Decimal::from(price), quantity }
}

/// Idli × 4 + Sambar × 2, no delivery, paid in full.
fn idli_order() -> Order {
    Order {
        id: OrderId::from("64f0c2a1"),
        order_number: OrderNumber::from("ORD-1001"),
        items: vec![item("Idli", 30, 4), item("Sambar", 20, 2)],
        total_amount: Decimal::from(160),
        delivery_charge: Decimal::ZERO,
        payment_type: PaymentType::Full,
        advance_amount: Decimal::from(160),
        remaining_amount: Decimal::ZERO,
        estimated_time: 20,
        special_instructions: None,
        is_fully_paid: true,
        created_at: Utc.with_ymd_and_hms(2026, 10, 17, 5, 30, 0).unwrap(),
        customer: Some(user()),
    }
}

/// Partial payment with delivery and instructions.
fn partial_order() -> Order {
    Order {
        id: OrderId::from("77aa01"),
        order_number: OrderNumber::from("ORD-1002"),
        items: vec![item("Masala Dosa", 80, 2), item("Filter Coffee", 25, 2)],
        total_amount: Decimal::from(250),
        delivery_charge: Decimal::from(40),
        payment_type: PaymentType::Partial,
        advance_amount: Decimal::from(100),
        remaining_amount: Decimal::from(150),
        estimated_time: 35,
        special_instructions: Some("Less spicy, please".to_string()),
        is_fully_paid: false,
        created_at: Utc.with_ymd_and_hms(2026, 10, 17, 5, 30, 0).unwrap(),
        customer: None,
    }
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn confirmation_lists_idli_and_sambar() {
    let html = renderer()
        .render_order_confirmation(&user(), &idli_order())
        .expect("render");
    assert!(html.contains("Idli × 4 — ₹120.00"), "missing Idli row:\n{html}");
    assert!(html.contains("Sambar × 2 — ₹40.00"), "missing Sambar row");
    assert!(html.contains("₹160.00"), "missing total");
    assert!(html.contains("Hi Asha Menon,"));
    assert!(html.contains("https://example.com/track-order/64f0c2a1"));
    assert!(html.contains("20 minutes"));
}

// ---------------------------------------------------------------------------
// Delivery charge
// ---------------------------------------------------------------------------

#[rstest]
#[case(EmailKind::AdminOrder)]
#[case(EmailKind::OrderConfirmation)]
#[case(EmailKind::Invoice)]
fn zero_delivery_charge_has_no_delivery_line(#[case] kind: EmailKind) {
    let payload = EmailPayload { user: Some(user()), order: Some(idli_order()), status: None };
    let email = renderer().render(kind, &payload).expect("render");
    assert!(!email.html.contains("Delivery Charge"), "{kind} shows delivery line");
}

#[rstest]
#[case(EmailKind::AdminOrder)]
#[case(EmailKind::OrderConfirmation)]
#[case(EmailKind::Invoice)]
fn positive_delivery_charge_is_shown(#[case] kind: EmailKind) {
    let payload = EmailPayload { user: Some(user()), order: Some(partial_order()), status: None };
    let email = renderer().render(kind, &payload).expect("render");
    assert!(email.html.contains("Delivery Charge"), "{kind} hides delivery line");
    assert!(email.html.contains("₹40.00"));
    assert!(email.html.contains("₹210.00"), "{kind} missing subtotal");
}

// ---------------------------------------------------------------------------
// Admin notification
// ---------------------------------------------------------------------------

#[test]
fn admin_fully_paid_banner_replaces_remaining_row() {
    let html = renderer().render_admin_order_notification(&idli_order()).expect("render");
    assert!(html.contains("FULLY PAID"));
    assert!(!html.contains("Remaining Amount"));
}

#[test]
fn admin_negative_remaining_counts_as_fully_paid() {
    let mut order = idli_order();
    order.remaining_amount = Decimal::from(-5);
    let html = renderer().render_admin_order_notification(&order).expect("render");
    assert!(html.contains("FULLY PAID"));
    assert!(!html.contains("Remaining Amount"));
}

#[test]
fn admin_partial_payment_details() {
    let html = renderer().render_admin_order_notification(&partial_order()).expect("render");
    assert!(html.contains("Partial Payment (Advance)"));
    assert!(html.contains("Remaining Amount"));
    assert!(html.contains("₹150.00"));
    assert!(!html.contains("FULLY PAID"));
    assert!(html.contains("Special Instructions"));
    assert!(html.contains("Less spicy, please"));
    // No nested customer on this order.
    assert!(html.contains(r#"<span class="value">N/A</span>"#));
    assert!(html.contains("17/10/2026, 11:00:00 am"));
    assert!(html.contains(r#"<div class="info-row payment-partial">"#));
}

#[test]
fn admin_without_instructions_has_no_block() {
    let html = renderer().render_admin_order_notification(&idli_order()).expect("render");
    assert!(!html.contains("Special Instructions"));
    assert!(html.contains("Full Payment"));
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

#[rstest]
#[case(160, 0, "₹160.00")]
#[case(250, 40, "₹210.00")]
#[case(99, 49, "₹50.00")]
fn invoice_subtotal_is_total_minus_delivery(
    #[case] total: i64,
    #[case] delivery: i64,
    #[case] subtotal: &str,
) {
    let mut order = idli_order();
    order.total_amount = Decimal::from(total);
    order.delivery_charge = Decimal::from(delivery);
    let html = renderer().render_invoice(&user(), &order).expect("render");
    let row = format!(
        r#"<span class="label">Subtotal</span><span class="value">{subtotal}</span>"#
    );
    assert!(html.contains(&row), "expected {row} in:\n{html}");
}

#[test]
fn invoice_banner_follows_fully_paid_flag() {
    let paid = renderer().render_invoice(&user(), &idli_order()).expect("render");
    assert!(paid.contains("PAID IN FULL"));
    assert!(!paid.contains("PAYMENT PENDING"));

    let pending = renderer().render_invoice(&user(), &partial_order()).expect("render");
    assert!(pending.contains("PAYMENT PENDING"));
    assert!(pending.contains("Balance Due"));
    assert!(!pending.contains("PAID IN FULL"));
}

#[test]
fn invoice_billing_block_uses_placeholders() {
    let html = renderer().render_invoice(&user(), &idli_order()).expect("render");
    assert!(html.contains("asha@example.com"));
    assert!(html.contains(r#"<span class="label">Phone</span><span class="value">N/A</span>"#));
    assert!(html.contains(r#"<span class="label">Invoice Date</span><span class="value">17/10/2026</span>"#));
}

// ---------------------------------------------------------------------------
// Order ready
// ---------------------------------------------------------------------------

#[test]
fn ready_shows_amount_due_prominently() {
    let html = renderer().render_order_ready(&user(), &partial_order()).expect("render");
    assert!(html.contains(r#"<div class="amount-due">₹150.00</div>"#));
    assert!(html.contains("https://example.com/track-order/77aa01"));
}

#[test]
fn ready_fully_paid_has_no_amount_due() {
    let html = renderer().render_order_ready(&user(), &idli_order()).expect("render");
    assert!(!html.contains("amount-due\">"));
    assert!(html.contains("Fully paid"));
}

// ---------------------------------------------------------------------------
// Status updates
// ---------------------------------------------------------------------------

#[test]
fn unknown_status_uses_fallback_presentation() {
    let html = renderer()
        .render_order_status(&user(), &idli_order(), "foo")
        .expect("unknown status is not an error");
    assert!(html.contains("📋"));
    assert!(html.contains("Order status updated"));
    assert!(html.contains("color: #666;"));
    assert!(html.contains(r#"<div class="status-label">FOO</div>"#));
    assert!(html.contains(r#"<div class="banner status-unknown""#));
}

#[test]
fn blank_status_uses_fallback_presentation() {
    let html = renderer()
        .render_order_status(&user(), &idli_order(), "")
        .expect("blank status is not an error");
    assert!(html.contains("📋"));
    assert!(html.contains("Order status updated"));
    assert!(html.contains("color: #666;"));
    assert!(html.contains(r#"<div class="status-label"></div>"#));
}

#[test]
fn status_label_is_uppercased_verbatim() {
    let html = renderer()
        .render_order_status(&user(), &idli_order(), "out-for-delivery")
        .expect("render");
    assert!(html.contains(r#"<div class="status-label">OUT-FOR-DELIVERY</div>"#));
}

#[test]
fn payload_without_status_is_missing_field() {
    let payload = EmailPayload { user: Some(user()), order: Some(idli_order()), status: None };
    let err = renderer().render(EmailKind::OrderStatus, &payload).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Data(DataError::MissingRequiredField { ref field }) if field == "status"
    ));
}

#[rstest]
#[case("preparing", "👨‍🍳", "Your order is being prepared", "PREPARING")]
#[case("Ready", "🎉", "Your order is ready for pickup", "READY")]
#[case("CANCELLED", "❌", "Your order has been cancelled", "CANCELLED")]
fn known_status_presentation(
    #[case] status: &str,
    #[case] emoji: &str,
    #[case] message: &str,
    #[case] label: &str,
) {
    let html = renderer()
        .render_order_status(&user(), &idli_order(), status)
        .expect("render");
    assert!(html.contains(emoji));
    assert!(html.contains(message));
    assert!(html.contains(&format!(r#"<div class="status-label">{label}</div>"#)));
    assert!(!html.contains(r#"<div class="banner status-unknown""#));
}

// ---------------------------------------------------------------------------
// Welcome
// ---------------------------------------------------------------------------

#[test]
fn welcome_links_to_menu() {
    let html = renderer().render_welcome(&user()).expect("render");
    assert!(html.contains("Hi Asha Menon,"));
    assert!(html.contains(r#"href="https://example.com/menu""#));
    assert!(html.contains("&copy; 2026 Our Kitchen"));
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn blank_user_name_is_missing_field() {
    let nameless = User { name: " ".to_string(), email: None, phone: None };
    let err = renderer().render_welcome(&nameless).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Data(DataError::MissingRequiredField { ref field }) if field == "user.name"
    ));
}

#[test]
fn negative_price_is_invalid_amount() {
    let mut order = idli_order();
    order.items[0].price = Decimal::from(-30);
    let err = renderer().render_invoice(&user(), &order).unwrap_err();
    assert!(matches!(err, RenderError::Data(DataError::InvalidAmount { .. })), "got: {err}");
}

#[test]
fn overflowing_line_total_is_invalid_amount() {
    let mut order = idli_order();
    order.items[0].price = Decimal::from_i128_with_scale(10_i128.pow(25), 0);
    order.items[0].quantity = 1_000_000;
    let err = renderer().render_invoice(&user(), &order).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Data(DataError::InvalidAmount { ref field, .. }) if field == "items[0].lineTotal"
    ));
}

#[test]
fn amount_too_large_for_two_decimals_is_invalid() {
    let mut order = idli_order();
    order.total_amount = Decimal::MAX;
    let err = renderer().render_invoice(&user(), &order).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Data(DataError::InvalidAmount { ref field, .. }) if field == "order.totalAmount"
    ));
}

#[test]
fn tracking_link_requires_order_id() {
    let mut order = idli_order();
    order.id = OrderId::from("");
    let err = renderer().render_order_ready(&user(), &order).unwrap_err();
    assert!(err.to_string().contains("order.id"));
    // The invoice carries no tracking link, so it still renders.
    renderer().render_invoice(&user(), &order).expect("invoice without id");
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

#[test]
fn user_supplied_text_is_escaped() {
    let mut order = partial_order();
    order.special_instructions = Some("<script>alert('x')</script>".to_string());
    order.items[0].name = "Dosa & <b>Chutney</b>".to_string();
    let sneaky = User { name: "<img src=x onerror=alert(1)>".to_string(), email: None, phone: None };
    order.customer = Some(sneaky.clone());

    let admin = renderer().render_admin_order_notification(&order).expect("render");
    assert!(!admin.contains("<script>"));
    assert!(admin.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    assert!(admin.contains("Dosa &amp; &lt;b&gt;Chutney&lt;/b&gt;"));
    assert!(!admin.contains("<img"));

    let confirmation = renderer().render_order_confirmation(&sneaky, &order).expect("render");
    assert!(!confirmation.contains("<img"));
    assert!(confirmation.contains("Hi &lt;img src=x onerror=alert(1)&gt;,"));
}

// ---------------------------------------------------------------------------
// Determinism and overrides
// ---------------------------------------------------------------------------

#[test]
fn rendering_is_idempotent_with_fixed_clock() {
    let r = renderer();
    let payload = EmailPayload {
        user: Some(user()),
        order: Some(partial_order()),
        status: Some("confirmed".to_string()),
    };
    for kind in EmailKind::all() {
        let first = r.render(*kind, &payload).expect("render #1");
        let second = r.render(*kind, &payload).expect("render #2");
        assert_eq!(first, second, "{kind} output is not stable");
    }

    let later = Renderer::new(config())
        .expect("renderer")
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2027, 3, 1, 6, 0, 0).unwrap()));
    let a = r.render_welcome(&user()).expect("render");
    let b = later.render_welcome(&user()).expect("render");
    assert_ne!(a, b, "footer year must follow the clock");
}

#[test]
fn renderer_is_shareable_across_threads() {
    let r = renderer();
    let expected = r.render_invoice(&user(), &idli_order()).expect("render");
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let html = r.render_invoice(&user(), &idli_order()).expect("render");
                assert_eq!(html, expected);
            });
        }
    });
}

#[test]
fn override_template_wins() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("welcome.html"),
        "<p>Custom welcome for {{ recipient.name }} from {{ brand.name }}</p>\n",
    )
    .expect("write override");

    let engine = TemplateEngine::new(Some(dir.path())).expect("engine");
    let r = Renderer::with_engine(engine, config()).with_clock(clock());
    let html = r.render_welcome(&user()).expect("render");
    assert_eq!(html.trim_end(), "<p>Custom welcome for Asha Menon from Our Kitchen</p>");

    // Untouched kinds keep the embedded templates.
    let invoice = r.render_invoice(&user(), &idli_order()).expect("render");
    assert!(invoice.contains("Billed To"));
}

#[test]
fn override_layout_applies_to_every_kind() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("Layout.HTML"),
        "<main data-brand=\"{{ brand.name }}\">{% block content %}{% endblock content %}</main>",
    )
    .expect("write layout");
    // Wrong extension: must be ignored.
    std::fs::write(dir.path().join("invoice.txt"), "ignored").expect("write txt");

    let engine = TemplateEngine::new(Some(dir.path())).expect("engine");
    let r = Renderer::with_engine(engine, config()).with_clock(clock());
    let html = r.render_invoice(&user(), &idli_order()).expect("render");
    assert!(html.starts_with("<main data-brand=\"Our Kitchen\">"), "got:\n{html}");
    assert!(html.contains("Billed To"));
}

#[test]
fn missing_override_dir_falls_back_to_embedded() {
    let dir = TempDir::new().expect("tempdir");
    let engine = TemplateEngine::new(Some(&dir.path().join("nope"))).expect("engine");
    let r = Renderer::with_engine(engine, config()).with_clock(clock());
    r.render_welcome(&user()).expect("render");
}
