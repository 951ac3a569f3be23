//! GraphQL type definitions.

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use crate::schema::ThreadQuery;

/// The thread listing schema served over HTTP.
pub type AgoraSchema = Schema<ThreadQuery, EmptyMutation, EmptySubscription>;
