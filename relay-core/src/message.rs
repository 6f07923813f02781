//! Message trait for decoded payloads.

/// A marker trait for payloads travelling from a hook to its sinks.
///
/// Payloads must be `Send + Sync + 'static` because one decoded payload is
/// shared by reference with every sink of the route, possibly concurrently.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Deserialize)]
/// struct PushEvent { r#ref: String }
///
/// // Covered by the blanket implementation.
/// fn assert_message<M: Message>() {}
/// assert_message::<PushEvent>();
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "Payloads are shared across sinks and must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Message for T {}
