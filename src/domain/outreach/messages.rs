//! Message templates for outreach, consent, and requester notices.
//!
//! The assistant speaks in a deliberately casual register; templates are
//! deterministic so tests can assert on delivery rather than wording.

/// Direct message sent to each outreach target.
pub fn outreach_ask(query: &str, topic_tags: &[String]) -> String {
    let topic = topic_tags.first().map(String::as_str).unwrap_or("this");
    format!(
        "hey! quick question - someone asked: \"{}\". are you into {}? \
         if yes and you're open to an intro, reply YES. if not, reply NO.",
        query, topic
    )
}

/// Consent question sent to a suggested candidate.
pub fn consent_request(topic_tags: &[String]) -> String {
    let topic = topic_tags.first().map(String::as_str).unwrap_or("this");
    format!(
        "hey! someone is looking for people who are into {}. \
         want me to connect you? reply YES or NO.",
        topic
    )
}

/// First message posted into a freshly created introduction channel.
pub fn introduction() -> String {
    "intro: you both mentioned you're into this - i'll let you take it from here.".to_string()
}

/// Title and body for the anonymous forum fallback post.
pub fn forum_post(topic_tags: &[String]) -> (String, String) {
    let title = match topic_tags.first() {
        Some(tag) => format!("Anyone into {}?", tag),
        None => "Looking for people to connect".to_string(),
    };
    let topics = if topic_tags.is_empty() {
        "this".to_string()
    } else {
        topic_tags.join(", ")
    };
    let body = format!(
        "Hey! I'm looking for people who are into {}. If that's you, drop a comment!",
        topics
    );
    (title, body)
}

/// Requester notice once the first batch goes out.
pub fn collection_started() -> String {
    "not sure yet - i'll ask a few people and report back.".to_string()
}

/// Requester notice when the search expands to more targets.
pub fn still_searching() -> String {
    "still waiting on replies - i asked a few more people.".to_string()
}

/// Requester notice when the forum fallback fires.
pub fn forum_posted() -> String {
    "couldn't find anyone yet, so i made an anonymous forum post. \
     i'll let you know if anyone replies."
        .to_string()
}

/// Requester question once a candidate is suggested.
pub fn candidate_found() -> String {
    "found someone who's down. want me to connect you?".to_string()
}

/// Requester notice when the introduction channel is created.
pub fn connected() -> String {
    "connected - i made a chat for you two.".to_string()
}

/// Candidate notice when the requester declines the introduction.
pub fn requester_moved_on() -> String {
    "hey! they already found someone, but if you're looking for people \
     who are into this, lmk and i can help."
        .to_string()
}

/// Requester notice when the requester declined and the search resumes.
pub fn kept_searching_after_requester_decline() -> String {
    "got it - i'll keep looking for someone else.".to_string()
}

/// Requester notice when the candidate declines.
pub fn candidate_unavailable() -> String {
    "they weren't available, but i'll keep looking.".to_string()
}

/// Requester notice when no introduction will be made.
pub fn no_connection() -> String {
    "no worries - i won't connect you.".to_string()
}

/// Requester notice when the run expires without a qualifying candidate.
pub fn search_expired() -> String {
    "i asked around but couldn't find anyone this time. \
     want me to try again later?"
        .to_string()
}
