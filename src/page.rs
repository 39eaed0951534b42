//! Landing page markup.
//!
//! DESIGN
//! ======
//! Rendering is a pure mapping from "optional principal" to an HTML
//! document so it can be tested without a server or an identity provider.
//! The route handler resolves the principal and then calls [`render_home`].
//!
//! The document has three regions inside `<main>`: the title, a block that
//! depends on the sign-in state, and a fixed status block.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::identity::PrincipalId;

/// Page heading. Rendered exactly once as the document's `<h1>`.
pub const TITLE: &str = "Engage Portal";

/// Shown to a visitor with a resolved principal.
pub const WELCOME_MESSAGE: &str = "Welcome! You are signed in.";

/// Shown to an anonymous visitor above the navigation links.
pub const SIGNED_OUT_MESSAGE: &str = "Get started by signing in to your account.";

/// Fixed navigation destinations. Served by the identity provider, not here.
pub const SIGN_IN_PATH: &str = "/sign-in";
pub const SIGN_UP_PATH: &str = "/sign-up";

pub const SIGN_IN_LABEL: &str = "Sign In";
pub const SIGN_UP_LABEL: &str = "Sign Up";

/// Rendered in this order regardless of sign-in state.
pub const STATUS_LINES: [&str; 3] = [
    "✅ Clerk Authentication configured",
    "✅ Supabase Database configured",
    "✅ Vercel Deployment ready",
];

const STYLESHEET: &str = r"
body { margin: 0; font-family: ui-sans-serif, system-ui, sans-serif; background: #fafafa; color: #000; }
.page { display: flex; min-height: 100vh; flex-direction: column; align-items: center; justify-content: center; }
main { display: flex; width: 100%; max-width: 48rem; flex-direction: column; align-items: center; gap: 2rem; padding: 8rem 4rem; background: #fff; box-sizing: border-box; }
h1 { margin: 0; font-size: 2.25rem; font-weight: 700; }
.session { display: flex; flex-direction: column; align-items: center; gap: 1rem; text-align: center; }
.session p { margin: 0; }
.lead { font-size: 1.125rem; color: #52525b; }
.user-id { font-size: 0.875rem; color: #71717a; }
.actions { display: flex; gap: 1rem; }
.button { display: flex; height: 3rem; align-items: center; justify-content: center; border-radius: 9999px; padding: 0 1.5rem; text-decoration: none; }
.button.primary { background: #171717; color: #fff; }
.button.primary:hover { background: #383838; }
.button.secondary { border: 1px solid rgba(0, 0, 0, 0.08); color: inherit; }
.button.secondary:hover { background: rgba(0, 0, 0, 0.04); }
.status { margin-top: 2rem; display: flex; flex-direction: column; gap: 0.5rem; font-size: 0.875rem; color: #71717a; }
.status p { margin: 0; }
@media (prefers-color-scheme: dark) {
  body, main { background: #000; color: #fafafa; }
  .lead { color: #a1a1aa; }
  .button.primary { background: #ededed; color: #0a0a0a; }
  .button.primary:hover { background: #ccc; }
  .button.secondary { border-color: rgba(255, 255, 255, 0.145); }
  .button.secondary:hover { background: #1a1a1a; }
}
";

/// Render the landing page for a visitor.
///
/// `Some(principal)` selects the signed-in greeting, `None` the sign-in and
/// sign-up links. The identifier is inserted as escaped text.
#[must_use]
pub fn render_home(principal: Option<&PrincipalId>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (TITLE) }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                div.page {
                    main {
                        h1 { (TITLE) }
                        (session_block(principal))
                        (status_block())
                    }
                }
            }
        }
    }
}

fn session_block(principal: Option<&PrincipalId>) -> Markup {
    match principal {
        Some(principal) => html! {
            div.session.signed-in {
                p.lead { (WELCOME_MESSAGE) }
                p.user-id { "User ID: " (principal.as_str()) }
            }
        },
        None => html! {
            div.session.signed-out {
                p.lead { (SIGNED_OUT_MESSAGE) }
                div.actions {
                    a.button.primary href=(SIGN_IN_PATH) { (SIGN_IN_LABEL) }
                    a.button.secondary href=(SIGN_UP_PATH) { (SIGN_UP_LABEL) }
                }
            }
        },
    }
}

fn status_block() -> Markup {
    html! {
        div.status {
            @for line in &STATUS_LINES {
                p { (line) }
            }
        }
    }
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
