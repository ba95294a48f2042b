//! Everything involved in publishing lots to the external channel and keeping
//! the published messages in sync with live auction state.
//!
//! The flow: [`publisher::ChannelPublisher`] composes content via [`compose`],
//! classifies attachments via [`media`], and talks to the channel through the
//! [`transport::ChannelTransport`] seam, gated by the shared
//! [`cooldown::Cooldown`]. The only concrete transport is
//! [`telegram::TelegramChannel`].

pub mod compose;
pub mod cooldown;
pub mod media;
pub mod publisher;
pub mod telegram;
pub mod transport;
