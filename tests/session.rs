use giftbox_rs::config::SessionConfig;
use giftbox_rs::engine::{draw, DrawPhase, Outcome};
use giftbox_rs::events::Event;
use giftbox_rs::platform::{DialogOption, Notice, NoticeLevel, Platform, Renderer};
use giftbox_rs::session::{Flow, Session};
use giftbox_rs::state::{Case, EconomyState, Ledger, TransactionKind, User};
use giftbox_rs::storage::{MemoryStorage, Persistence, DEFAULT_STORAGE_KEY};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;

struct FakePlatform {
    user: Option<User>,
    answer: Option<String>,
}

impl Platform for FakePlatform {
    async fn confirm(
        &self,
        _title: &str,
        _message: &str,
        _options: &[DialogOption],
    ) -> Option<String> {
        self.answer.clone()
    }

    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

#[derive(Default)]
struct Recorder {
    notices: Vec<Notice>,
    prizes: Vec<Outcome>,
    case_renders: usize,
    gift_renders: usize,
    history_renders: usize,
}

impl Recorder {
    fn last_notice(&self) -> &Notice {
        self.notices.last().expect("no notice recorded")
    }
}

impl Renderer for Recorder {
    fn render_cases(&mut self, _state: &EconomyState) {
        self.case_renders += 1;
    }

    fn render_gifts(&mut self, _case: &Case) {
        self.gift_renders += 1;
    }

    fn render_transactions(&mut self, _ledger: &Ledger) {
        self.history_renders += 1;
    }

    fn render_prize(&mut self, outcome: &Outcome) {
        self.prizes.push(outcome.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

type TestSession = Session<MemoryStorage, FakePlatform, Recorder>;

fn ivan() -> User {
    // Donor of gift 1 in the seeded data
    User {
        id: 123,
        first_name: "Ivan".to_string(),
        last_name: "I.".to_string(),
        username: "ivan".to_string(),
        photo_url: None,
    }
}

fn instant_spin() -> SessionConfig {
    SessionConfig {
        spin_secs: 0.0,
        ..SessionConfig::default()
    }
}

/// A seed whose first draw from `case_id` of a fresh state lands on `gift_id`.
fn seed_drawing(case_id: u64, gift_id: u64) -> u64 {
    let state = EconomyState::new();
    let case = state.case(case_id).unwrap();
    (0..10_000)
        .find(|&seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            draw(case, &mut rng).unwrap().id == gift_id
        })
        .expect("no seed found")
}

fn start_session(
    storage: MemoryStorage,
    platform: FakePlatform,
    seed: u64,
) -> (TestSession, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(16);
    let session = Session::start(
        Persistence::new(storage, DEFAULT_STORAGE_KEY),
        platform,
        Recorder::default(),
        instant_spin(),
        tx,
        StdRng::seed_from_u64(seed),
    );
    (session, rx)
}

fn anonymous() -> FakePlatform {
    FakePlatform {
        user: None,
        answer: None,
    }
}

/// Open a case and feed the spin completion back in.
async fn open_and_spin(session: &mut TestSession, rx: &mut mpsc::Receiver<Event>, case_id: u64) {
    session.handle(Event::OpenCase { case_id }).await;
    let spun = rx.recv().await.unwrap();
    assert_eq!(spun, Event::SpinFinished { case_id });
    session.handle(spun).await;
}

#[tokio::test]
async fn test_open_then_claim_scenario() {
    let storage = MemoryStorage::new();
    let (mut session, mut rx) = start_session(storage.clone(), anonymous(), seed_drawing(1, 1));
    assert_eq!(session.state().balance, dec!(1000));

    session.handle(Event::OpenCase { case_id: 1 }).await;
    assert_eq!(session.state().balance, dec!(895));
    assert_eq!(session.state().stats.opened, 1);
    let tx = session.state().ledger.newest().unwrap();
    assert_eq!(tx.amount, dec!(-105));
    assert_eq!(tx.kind, TransactionKind::CaseOpened);
    assert_eq!(session.phase(), &DrawPhase::Drawing { case_id: 1 });

    let spun = rx.recv().await.unwrap();
    session.handle(spun).await;
    let prize = &session.renderer().prizes[0];
    assert_eq!(prize.prize.value, dec!(500));
    assert!(!prize.own);
    // Donor deduction is only a notice
    assert_eq!(session.renderer().last_notice().level, NoticeLevel::Info);
    assert!(session.renderer().last_notice().message.contains("Ivan I."));
    // Drawing alone leaves the case alone
    assert_eq!(session.state().case(1).unwrap().gifts.len(), 3);

    session.handle(Event::Claim).await;
    assert_eq!(session.state().balance, dec!(1395));
    assert_eq!(session.state().stats.won, 1);
    let case = session.state().case(1).unwrap();
    assert_eq!(case.gifts.len(), 2);
    assert!(case.gift(1).is_none());
    assert_eq!(session.renderer().last_notice().level, NoticeLevel::Success);

    let saved = Persistence::new(storage, DEFAULT_STORAGE_KEY)
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(saved.balance, dec!(1395));
    assert_eq!(saved.cases, session.state().cases);
    assert_eq!(saved.ledger, session.state().ledger);
}

#[tokio::test]
async fn test_second_open_rejected_while_drawing() {
    let (mut session, mut rx) = start_session(MemoryStorage::new(), anonymous(), 1);

    session.handle(Event::OpenCase { case_id: 1 }).await;
    session.handle(Event::OpenCase { case_id: 2 }).await;

    assert_eq!(session.state().balance, dec!(895));
    assert_eq!(session.state().stats.opened, 1);
    let notice = session.renderer().last_notice();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "a draw is already in progress");

    // The first spin still completes
    let spun = rx.recv().await.unwrap();
    assert_eq!(spun, Event::SpinFinished { case_id: 1 });
}

#[tokio::test]
async fn test_own_gift_reclaimed_without_payout() {
    let platform = FakePlatform {
        user: Some(ivan()),
        answer: None,
    };
    let (mut session, mut rx) = start_session(MemoryStorage::new(), platform, seed_drawing(1, 1));

    open_and_spin(&mut session, &mut rx, 1).await;
    assert!(session.renderer().prizes[0].own);

    session.handle(Event::Claim).await;
    assert_eq!(session.state().balance, dec!(895));
    assert_eq!(session.state().stats.won, 0);
    assert!(session.state().case(1).unwrap().gift(1).is_none());
}

#[tokio::test]
async fn test_try_again_keeps_unclaimed_gift() {
    let (mut session, mut rx) = start_session(MemoryStorage::new(), anonymous(), 3);

    open_and_spin(&mut session, &mut rx, 2).await;
    session.handle(Event::TryAgain).await;

    assert_eq!(session.phase(), &DrawPhase::Idle);
    assert_eq!(session.state().focused, Some(2));
    assert_eq!(session.state().case(2).unwrap().gifts.len(), 2);
    // Fee stays spent
    assert_eq!(session.state().balance, dec!(737));

    // Nothing left to claim
    session.handle(Event::Claim).await;
    assert_eq!(session.renderer().last_notice().level, NoticeLevel::Error);

    // Reopening works again
    open_and_spin(&mut session, &mut rx, 2).await;
    assert_eq!(session.renderer().prizes.len(), 2);
}

#[tokio::test]
async fn test_empty_case_cannot_be_opened() {
    let (mut session, _rx) = start_session(MemoryStorage::new(), anonymous(), 1);

    session
        .handle(Event::CreateCase {
            name: "Fresh".to_string(),
            price: dec!(50),
            description: String::new(),
            color: "#ffffff".to_string(),
        })
        .await;
    assert_eq!(session.state().cases.len(), 4);

    session.handle(Event::OpenCase { case_id: 4 }).await;
    assert_eq!(session.renderer().last_notice().message, "case has no gifts");
    assert_eq!(session.state().balance, dec!(1000));
    assert!(session.state().ledger.is_empty());
}

#[tokio::test]
async fn test_add_gift_then_open() {
    let platform = FakePlatform {
        user: Some(ivan()),
        answer: None,
    };
    let (mut session, mut rx) = start_session(MemoryStorage::new(), platform, 1);

    session
        .handle(Event::AddGift {
            case_id: 2,
            name: "Kindle".to_string(),
            value: dec!(9),
            description: "E-reader".to_string(),
        })
        .await;
    assert_eq!(session.renderer().last_notice().message, "gift value must be at least 10");
    assert_eq!(session.state().case(2).unwrap().gifts.len(), 2);

    session
        .handle(Event::AddGift {
            case_id: 2,
            name: "Kindle".to_string(),
            value: dec!(100),
            description: "E-reader".to_string(),
        })
        .await;
    assert_eq!(session.state().balance, dec!(895));
    assert_eq!(session.state().stats.added, 1);
    let gift = session.state().case(2).unwrap().gifts.last().unwrap();
    assert_eq!(gift.donor.id(), 123);
    assert_eq!(session.state().focused, Some(2));

    open_and_spin(&mut session, &mut rx, 2).await;
    assert_eq!(session.renderer().prizes.len(), 1);
}

#[tokio::test]
async fn test_deposit_needs_confirmation() {
    let declined = FakePlatform {
        user: None,
        answer: Some("cancel".to_string()),
    };
    let (mut session, _rx) = start_session(MemoryStorage::new(), declined, 1);
    session.handle(Event::Deposit).await;
    assert_eq!(session.state().balance, dec!(1000));
    assert!(session.state().ledger.is_empty());

    let accepted = FakePlatform {
        user: None,
        answer: Some("ok".to_string()),
    };
    let (mut session, _rx) = start_session(MemoryStorage::new(), accepted, 1);
    session.handle(Event::Deposit).await;
    assert_eq!(session.state().balance, dec!(1500));
    assert_eq!(
        session.state().ledger.newest().unwrap().kind,
        TransactionKind::Deposit
    );
}

#[tokio::test]
async fn test_storage_failure_keeps_running_in_memory() {
    let (mut session, _rx) = start_session(MemoryStorage::failing(), anonymous(), 1);
    assert_eq!(session.state(), &EconomyState::new());

    session.handle(Event::OpenCase { case_id: 1 }).await;
    assert_eq!(session.state().balance, dec!(895));
    let levels: Vec<NoticeLevel> = session.renderer().notices.iter().map(|n| n.level).collect();
    assert!(levels.contains(&NoticeLevel::Warning));
}

#[tokio::test]
async fn test_state_survives_restart() {
    let storage = MemoryStorage::new();
    {
        let (mut session, _rx) = start_session(storage.clone(), anonymous(), 1);
        session.handle(Event::OpenCase { case_id: 3 }).await;
        session.handle(Event::ViewCase { case_id: 2 }).await;
    }

    let (session, _rx) = start_session(storage, anonymous(), 1);
    assert_eq!(session.state().balance, dec!(475));
    assert_eq!(session.state().stats.opened, 1);
    assert_eq!(session.state().ledger.len(), 1);
    assert!(session.state().focused.is_none());
}

#[tokio::test]
async fn test_reset_and_views() {
    let (mut session, _rx) = start_session(MemoryStorage::new(), anonymous(), 1);

    session.handle(Event::ViewCase { case_id: 99 }).await;
    assert_eq!(session.renderer().last_notice().message, "case 99 not found");

    session.handle(Event::ShowHistory).await;
    assert_eq!(session.renderer().history_renders, 1);

    session.handle(Event::OpenCase { case_id: 1 }).await;
    // Cannot reset mid-spin
    session.handle(Event::Reset).await;
    assert_eq!(session.state().balance, dec!(895));

    assert_eq!(session.handle(Event::Shutdown).await, Flow::Stop);
}

#[tokio::test]
async fn test_run_loop() {
    let platform = FakePlatform {
        user: None,
        answer: Some("ok".to_string()),
    };
    let (tx, rx) = mpsc::channel(16);
    let session = Session::start(
        Persistence::new(MemoryStorage::new(), DEFAULT_STORAGE_KEY),
        platform,
        Recorder::default(),
        instant_spin(),
        tx.clone(),
        StdRng::seed_from_u64(1),
    );

    tx.send(Event::Deposit).await.unwrap();
    tx.send(Event::Reset).await.unwrap();
    tx.send(Event::Deposit).await.unwrap();
    tx.send(Event::Shutdown).await.unwrap();

    let state = session.run(rx).await;
    assert_eq!(state.balance, dec!(1500));
    assert_eq!(state.ledger.len(), 1);
}
