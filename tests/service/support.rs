//! A composed service over a seeded in-memory store.

use std::collections::HashMap;

use orgdesk::domain::{
    Announcement, Attempt, Notification, OrganizationalUnit, Question, QuestionType, Quiz,
    QuizKind, SubmittedAnswer, User,
};
use orgdesk::service::{self, CommandRequest, Service};
use orgdesk::{AdminConfig, Document, DocumentsExt, InMemoryDocumentStore, ResponseEnvelope};
use serde_json::Value;

pub const COMPANY: &str = "acme";

/// Ids of the seeded documents.
pub struct Fixture {
    pub branch: OrganizationalUnit,
    pub user: User,
    pub announcement: Announcement,
    pub quiz: Quiz,
    pub notification: Notification,
}

fn insert<D: Document>(store: &InMemoryDocumentStore, document: &D) {
    store.documents::<D>().insert(document).unwrap();
}

pub fn seed() -> (Service<InMemoryDocumentStore>, Fixture) {
    let store = InMemoryDocumentStore::new();

    let hq = OrganizationalUnit::root("HQ").with_company(COMPANY);
    let branch = OrganizationalUnit::child_of(&hq, "Branch");
    let user = User::new("Layla", "layla@acme.test").in_ou(&branch);

    let mut announcement = Announcement::new("Policy", "Read me");
    announcement.respond(&user.id, "Agree", 1_000);

    let quiz = Quiz::new("Onboarding check", QuizKind::Assessment);
    let question = Question::new(&quiz, "2 + 2?", QuestionType::SingleChoice).with_answer("4");
    let attempt = Attempt::new(&quiz, &user.id).answer(SubmittedAnswer::value(&question, "4"));

    let notification = Notification::to_user(&user.id, "Welcome", "Hello");

    insert(&store, &hq);
    insert(&store, &branch);
    insert(&store, &user);
    insert(&store, &announcement);
    insert(&store, &quiz);
    insert(&store, &question);
    insert(&store, &attempt);
    insert(&store, &notification);

    let fixture = Fixture {
        branch,
        user,
        announcement,
        quiz,
        notification,
    };
    (service::compose(store, AdminConfig::default()), fixture)
}

pub fn request(command: &str, input: Value, session: &[(&str, &str)]) -> CommandRequest {
    CommandRequest {
        command: command.to_string(),
        input,
        session_variables: session
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

pub fn send(
    service: &Service<InMemoryDocumentStore>,
    command: &str,
    input: Value,
    session: &[(&str, &str)],
) -> ResponseEnvelope {
    service.dispatch_request(&request(command, input, session))
}
