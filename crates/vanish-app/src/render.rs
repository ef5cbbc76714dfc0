use vanish_engine::view::{CountdownView, MessageView, RosterView, UserView};
use vanish_types::api::VanishPreset;
use vanish_types::events::RemovalReason;

pub fn message_line(view: &MessageView) -> String {
    if view.is_system {
        return format!("        ── {} ──", view.content);
    }

    let mut line = format!(
        "[{}] {} {} ({}): {}",
        view.short_id, view.time_label, view.avatar_initial, view.author, view.content
    );
    if let Some(countdown) = &view.countdown {
        line.push_str(&format!("  ⏱ {}", countdown_text(countdown)));
    }
    line
}

pub fn countdown_text(countdown: &CountdownView) -> String {
    if countdown.urgent {
        format!("{}!", countdown.label)
    } else {
        countdown.label.clone()
    }
}

pub fn removal_line(short_id: &str, reason: RemovalReason) -> String {
    match reason {
        RemovalReason::Expired => format!("[{short_id}] vanished"),
        RemovalReason::Deleted => format!("[{short_id}] deleted"),
    }
}

pub fn roster(view: &RosterView) -> String {
    let mut out = format!("Users: {}\n", view.header);
    out.push_str(&format!("  You\n    {}\n", user_line(&view.you)));
    if !view.online.is_empty() {
        out.push_str(&format!("  Online ({})\n", view.online.len()));
        for user in &view.online {
            out.push_str(&format!("    {}\n", user_line(user)));
        }
    }
    if !view.offline.is_empty() {
        out.push_str(&format!("  Offline ({})\n", view.offline.len()));
        for user in &view.offline {
            out.push_str(&format!("    {}\n", user_line(user)));
        }
    }
    out
}

fn user_line(user: &UserView) -> String {
    let dot = if user.status == "Online" { '●' } else { '○' };
    format!("{dot} {} {} · {}", user.initial, user.username, user.status)
}

pub fn presets(selected: VanishPreset) -> String {
    VanishPreset::ALL
        .iter()
        .map(|p| {
            if *p == selected {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub const HELP: &str = "\
Type a message and press Enter to send it.
  /vanish <10s|30s|1m|5m|forever>  auto-vanish for the next message
  /presets                         show vanish presets
  /delete <id>                     delete one of your messages
  /list                            show the timeline
  /users                           show who is online
  /json                            dump the timeline as JSON
  /quit                            leave";
