//! HTML bodies for the friend request and acceptance emails.

use indoc::formatdoc;

use super::{FriendInvite, OutgoingEmail};

/// Escape text for use inside HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `{app_url}/friends/accept?email=..&sender=..[&token=..]`
pub fn accept_link(app_url: &str, invite: &FriendInvite, token: Option<&str>) -> String {
    let mut link = format!(
        "{}/friends/accept?email={}&sender={}",
        app_url.trim_end_matches('/'),
        urlencoding::encode(invite.friend_email.trim()),
        urlencoding::encode(invite.sender_email.trim()),
    );
    if let Some(token) = token {
        link.push_str("&token=");
        link.push_str(&urlencoding::encode(token));
    }
    link
}

fn layout(title: &str, tagline: &str, body: &str) -> String {
    formatdoc! {r#"
        <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
          <div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 40px; text-align: center; color: white;">
            <h1 style="margin: 0; font-size: 28px;">{title}</h1>
            <p style="margin: 10px 0 0 0; opacity: 0.9;">{tagline}</p>
          </div>
          <div style="padding: 40px; background: #f8f9fa;">
        {body}
          </div>
          <div style="background: #333; padding: 20px; text-align: center; color: white;">
            <p style="margin: 0; font-size: 14px;">&copy; FocusOS. All rights reserved.</p>
          </div>
        </div>
    "#, title = title, tagline = tagline, body = body}
}

fn button(href: &str, label: &str) -> String {
    formatdoc! {r#"
        <div style="text-align: center; margin: 30px 0;">
          <a href="{href}" style="background: #667eea; color: white; padding: 15px 30px; text-decoration: none; border-radius: 8px; display: inline-block; font-weight: bold;">{label}</a>
        </div>
    "#, href = escape_html(href), label = label}
}

/// Invitation sent to the friend on behalf of the sender.
pub fn friend_request_email(
    invite: &FriendInvite,
    from: &str,
    app_url: &str,
    token: Option<&str>,
) -> OutgoingEmail {
    let friend_name = escape_html(invite.friend_name.trim());
    let sender_name = escape_html(invite.sender_name.trim());
    let sender_email = escape_html(invite.sender_email.trim());
    let accept = button(&accept_link(app_url, invite, token), "Accept Friend Request");

    let body = formatdoc! {r#"
        <h2 style="color: #333; margin-bottom: 20px;">Hello {friend_name}!</h2>
        <p style="color: #666; line-height: 1.6; margin-bottom: 25px;">
          <strong>{sender_name}</strong> ({sender_email}) wants to connect with you on FocusOS!
        </p>
        <p style="color: #666; line-height: 1.6; margin-bottom: 25px;">
          FocusOS is a productivity platform that helps you stay focused and achieve your goals.
          When you accept this friend request, you'll be able to:
        </p>
        <ul style="color: #666; line-height: 1.6; margin-bottom: 25px; padding-left: 20px;">
          <li>Share tasks and goals</li>
          <li>Track progress together</li>
          <li>Stay motivated as a team</li>
          <li>Celebrate achievements</li>
        </ul>
        {accept}
        <p style="color: #999; font-size: 14px; text-align: center; margin-top: 30px;">
          If you don't want to accept this request, you can simply ignore this email.
        </p>
    "#,
        friend_name = friend_name,
        sender_name = sender_name,
        sender_email = sender_email,
        accept = accept,
    };

    OutgoingEmail {
        from: from.to_string(),
        to: vec![invite.friend_email.trim().to_string()],
        subject: format!(
            "{} wants to be your friend on FocusOS!",
            invite.sender_name.trim()
        ),
        html: layout("FocusOS Friend Request", "Stay focused together!", &body),
    }
}

/// Notice sent back to the original sender once the friend accepts.
pub fn friend_accepted_email(invite: &FriendInvite, from: &str, app_url: &str) -> OutgoingEmail {
    let friend_name = escape_html(invite.friend_name.trim());
    let sender_name = escape_html(invite.sender_name.trim());
    let friends_page = button(
        &format!("{}/friends", app_url.trim_end_matches('/')),
        "View Your Friends",
    );

    let body = formatdoc! {r#"
        <h2 style="color: #333; margin-bottom: 20px;">Great news, {sender_name}!</h2>
        <p style="color: #666; line-height: 1.6; margin-bottom: 25px;">
          <strong>{friend_name}</strong> has accepted your friend request on FocusOS!
        </p>
        <p style="color: #666; line-height: 1.6; margin-bottom: 25px;">You can now:</p>
        <ul style="color: #666; line-height: 1.6; margin-bottom: 25px; padding-left: 20px;">
          <li>Create shared tasks and goals</li>
          <li>Track each other's progress</li>
          <li>Send motivational messages</li>
          <li>Celebrate achievements together</li>
        </ul>
        {friends_page}
    "#,
        sender_name = sender_name,
        friend_name = friend_name,
        friends_page = friends_page,
    };

    OutgoingEmail {
        from: from.to_string(),
        to: vec![invite.sender_email.trim().to_string()],
        subject: format!(
            "{} accepted your friend request on FocusOS!",
            invite.friend_name.trim()
        ),
        html: layout("Friend Request Accepted!", "Stay focused together!", &body),
    }
}
