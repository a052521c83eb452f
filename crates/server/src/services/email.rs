//! Email service for order confirmations.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Sending is
//! best-effort at the call sites: a failed confirmation email never fails the
//! order it describes.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use giftly_core::format_inr;

use crate::config::EmailConfig;
use crate::models::Order;

/// One line item as rendered in the confirmation email.
struct ItemLine {
    name: String,
    quantity: i32,
    line_total: String,
}

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order_number: &'a str,
    items: Vec<ItemLine>,
    subtotal: String,
    shipping_cost: String,
    discount: String,
    tax: String,
    total: String,
    address_block: String,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order_number: &'a str,
    items: Vec<ItemLine>,
    subtotal: String,
    shipping_cost: String,
    discount: String,
    tax: String,
    total: String,
    address_block: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for transactional order mail.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay is misconfigured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the order confirmation email to the purchaser.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to
    /// render.
    pub async fn send_order_confirmation(&self, to: &str, order: &Order) -> Result<(), EmailError> {
        let items: Vec<ItemLine> = order
            .items
            .iter()
            .map(|item| ItemLine {
                name: item.name.clone(),
                quantity: item.quantity,
                line_total: format_inr(item.line_total()),
            })
            .collect();
        let items_text: Vec<ItemLine> = order
            .items
            .iter()
            .map(|item| ItemLine {
                name: item.name.clone(),
                quantity: item.quantity,
                line_total: format_inr(item.line_total()),
            })
            .collect();

        let html = OrderConfirmationHtml {
            order_number: &order.order_number,
            items,
            subtotal: format_inr(order.subtotal),
            shipping_cost: format_inr(order.shipping_cost),
            discount: format_inr(order.discount),
            tax: format_inr(order.tax),
            total: format_inr(order.total),
            address_block: order.shipping_address.block(),
        }
        .render()?;
        let text = OrderConfirmationText {
            order_number: &order.order_number,
            items: items_text,
            subtotal: format_inr(order.subtotal),
            shipping_cost: format_inr(order.shipping_cost),
            discount: format_inr(order.discount),
            tax: format_inr(order.tax),
            total: format_inr(order.total),
            address_block: order.shipping_address.block(),
        }
        .render()?;

        let subject = format!("Your Giftly order {}", order.order_number);
        self.send_multipart_email(to, &subject, &text, &html).await
    }

    /// Build and send a multipart (text + HTML) email.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: &str,
    ) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html.to_string()),
                    ),
            )?;

        self.mailer.send(message).await?;
        Ok(())
    }
}
