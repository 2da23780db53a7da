use deck_core::{BrowsingController, RenderState};
use shared::domain::Profile;

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub reveal_passwords: bool,
}

pub fn render(controller: &BrowsingController, options: &ViewOptions) -> String {
    match controller.render_state() {
        RenderState::Loading => "Loading profiles...".to_string(),
        RenderState::Error(message) => format!("error: {message}"),
        RenderState::Content(profile) => {
            let mut lines = profile_card(profile, options);
            lines.push(nav_bar(controller));
            lines.join("\n")
        }
    }
}

fn profile_card(profile: &Profile, options: &ViewOptions) -> Vec<String> {
    let password = if options.reveal_passwords {
        profile.password.clone()
    } else {
        profile.masked_password()
    };
    vec![
        format!("  {}", profile.full_name()),
        format!("  @{}", profile.username),
        format!("  {}", profile.email),
        format!("  avatar:   {}", profile.avatar_url),
        format!("  ID:       {}", profile.id.0),
        format!("  UID:      {}", profile.uid),
        format!("  Password: {password}"),
    ]
}

fn nav_bar(controller: &BrowsingController) -> String {
    let previous = if controller.can_go_previous() {
        "◀ Previous [p]"
    } else {
        "              "
    };
    let next = if controller.can_go_next() {
        "[n] Next ▶"
    } else {
        ""
    };
    format!(
        "{previous}   {} / {}   {next}",
        controller.position() + 1,
        controller.total()
    )
    .trim_end()
    .to_string()
}
