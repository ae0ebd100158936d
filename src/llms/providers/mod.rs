//! LLM provider implementations.
//!
//! Each provider implements [`Transport`](crate::llms::transport::Transport)
//! and owns the knowledge of its own response format.
//!
//! | Provider | Module |
//! |----------|--------|
//! | Gemini | [`gemini`] |

pub mod gemini;
