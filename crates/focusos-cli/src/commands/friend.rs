//! Friends list and invitation emails.

use clap::Subcommand;
use focusos_core::auth::Session;
use focusos_core::mail::{
    friend_accepted_email, friend_request_email, FriendInvite, InviteSigner, MailClient,
    MailOutcome,
};
use focusos_core::storage::{Config, LocalStorage};
use focusos_core::store::{FriendStatus, NewFriend};

use super::{open_store, print_json, require_session, CmdResult};

#[derive(Subcommand)]
pub enum FriendAction {
    /// Add a friend without sending email
    Add {
        name: String,
        email: String,
        /// pending, accepted, online, offline or blocked
        #[arg(long, default_value = "pending")]
        status: FriendStatus,
    },
    /// List friends
    List {
        #[arg(long)]
        status: Option<FriendStatus>,
    },
    /// Change a friend's status
    Status { id: String, status: FriendStatus },
    /// Remove a friend
    Delete { id: String },
    /// Add a pending friend and email them an invitation
    Invite { name: String, email: String },
    /// Accept an invitation: add the sender and email them
    Accept {
        /// Name of the person who invited you
        name: String,
        /// Their email (the `sender` in the invitation link)
        email: String,
        /// Token from the invitation link, when links are signed
        #[arg(long)]
        token: Option<String>,
    },
}

fn send(mail: &MailClient, email: &focusos_core::OutgoingEmail) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match runtime.block_on(mail.send(email))? {
        MailOutcome::Sent { id } => eprintln!("email sent ({id})"),
        MailOutcome::Skipped => eprintln!("email service not configured; no email sent"),
    }
    Ok(())
}

fn signer(config: &Config) -> Result<Option<InviteSigner>, Box<dyn std::error::Error>> {
    match config.mail.invite_secret.as_deref() {
        Some(secret) if !secret.is_empty() => Ok(Some(InviteSigner::new(secret)?)),
        _ => Ok(None),
    }
}

fn invite_for(session: &Session, friend_name: &str, friend_email: &str) -> FriendInvite {
    FriendInvite {
        friend_email: friend_email.trim().to_string(),
        friend_name: friend_name.trim().to_string(),
        sender_name: session.user.display_name.clone(),
        sender_email: session.user.email.clone(),
    }
}

pub fn run(action: FriendAction) -> CmdResult {
    let storage = LocalStorage::open()?;
    let config = Config::load()?;
    let mut store = open_store(&storage, &config)?;

    match action {
        FriendAction::Add {
            name,
            email,
            status,
        } => {
            let friend = store.add_friend(NewFriend {
                name,
                email,
                status,
            })?;
            print_json(&friend)?;
        }
        FriendAction::List { status } => {
            let friends: Vec<_> = store
                .state()
                .friends
                .iter()
                .filter(|f| status.is_none_or(|s| f.status == s))
                .collect();
            print_json(&friends)?;
        }
        FriendAction::Status { id, status } => {
            let friend = store.update_friend_status(&id, status)?;
            print_json(&friend)?;
        }
        FriendAction::Delete { id } => {
            store.delete_friend(&id)?;
            println!("Friend removed: {id}");
        }
        FriendAction::Invite { name, email } => {
            if store.friend_by_email(&email).is_some() {
                return Err(format!("{email} is already in your friends list").into());
            }
            let session = require_session(&storage)?;
            let invite = invite_for(&session, &name, &email);
            if !invite.is_complete() {
                return Err("friend name and email are required".into());
            }

            // Only a delivered (or deliberately skipped) invite is remembered.
            let token = signer(&config)?
                .map(|s| s.sign(&invite.friend_email, &invite.sender_email));
            let message = friend_request_email(
                &invite,
                &config.mail.from,
                &config.mail.app_url,
                token.as_deref(),
            );
            send(&MailClient::from_env(config.mail.api_base.clone()), &message)?;

            let friend = store.add_friend(NewFriend {
                name: invite.friend_name,
                email: invite.friend_email,
                status: FriendStatus::Pending,
            })?;
            print_json(&friend)?;
        }
        FriendAction::Accept { name, email, token } => {
            let session = require_session(&storage)?;
            // In the link, we are the friend and they are the sender.
            let invite = FriendInvite {
                friend_email: session.user.email.clone(),
                friend_name: session.user.display_name.clone(),
                sender_name: name.trim().to_string(),
                sender_email: email.trim().to_string(),
            };
            if !invite.is_complete() {
                return Err("sender name and email are required".into());
            }
            if let Some(signer) = signer(&config)? {
                let valid = token.as_deref().is_some_and(|t| {
                    signer.verify(&invite.friend_email, &invite.sender_email, t)
                });
                if !valid {
                    return Err("invalid invitation token".into());
                }
            }

            let notice = friend_accepted_email(&invite, &config.mail.from, &config.mail.app_url);
            send(&MailClient::from_env(config.mail.api_base.clone()), &notice)?;

            let friend = match store.friend_by_email(&invite.sender_email).cloned() {
                Some(existing) => store.update_friend_status(&existing.id, FriendStatus::Accepted)?,
                None => store.add_friend(NewFriend {
                    name: invite.sender_name,
                    email: invite.sender_email,
                    status: FriendStatus::Accepted,
                })?,
            };
            print_json(&friend)?;
        }
    }
    Ok(())
}
