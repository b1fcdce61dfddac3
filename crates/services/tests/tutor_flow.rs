use std::sync::Arc;

use async_trait::async_trait;

use services::ports::{
    NullSpeakingIndicator, RecordingCelebrationEffect, RecordingRenderer, RecordingSoundEffects,
    RenderEvent, SoundCue,
};
use services::{
    AnswerOutcome, AppServices, NavOutcome, NullAudioSink, Pacing, ProgressLedger, QuizRound,
    SilentNarrator, SpeechService, SubmitOutcome, TutorLoopService, TutorPhase, TutorPorts,
};
use storage::repository::{InMemoryStore, ProgressRepository, Storage, StorageError};
use tutor_core::model::{NarratorSettingsDraft, Operation, Progress, VoicePreference};
use tutor_core::time::{fixed_clock, fixed_today};

struct Harness {
    service: TutorLoopService,
    renderer: RecordingRenderer,
    sounds: RecordingSoundEffects,
    celebration: RecordingCelebrationEffect,
    store: InMemoryStore,
}

fn harness() -> Harness {
    let store = InMemoryStore::new();
    let renderer = RecordingRenderer::new();
    let sounds = RecordingSoundEffects::new();
    let celebration = RecordingCelebrationEffect::new();
    let speech = SpeechService::new(Arc::new(SilentNarrator), Arc::new(NullSpeakingIndicator));
    let service = TutorLoopService::new(
        fixed_clock(),
        speech,
        Arc::new(renderer.clone()),
        Arc::new(sounds.clone()),
        Arc::new(celebration.clone()),
        ProgressLedger::new(Arc::new(store.clone())),
    )
    .with_pacing(Pacing::ZERO);
    Harness {
        service,
        renderer,
        sounds,
        celebration,
        store,
    }
}

fn step_positions(renderer: &RecordingRenderer) -> Vec<usize> {
    renderer
        .events()
        .into_iter()
        .filter_map(|event| match event {
            RenderEvent::Step { position, .. } => Some(position),
            _ => None,
        })
        .collect()
}

fn correct_choice(round: &QuizRound) -> usize {
    let question = round.question();
    question
        .options()
        .iter()
        .position(|&option| option == question.correct())
        .expect("correct option present")
}

fn wrong_choice(round: &QuizRound) -> usize {
    let question = round.question();
    question
        .options()
        .iter()
        .position(|&option| option != question.correct())
        .expect("wrong option present")
}

#[tokio::test]
async fn typed_problem_walks_through_and_pays_a_star() {
    let h = harness();
    let mut session = h.service.new_session().await;

    let outcome = h
        .service
        .submit(&mut session, Operation::Add, 3, 4, false)
        .await;
    assert_eq!(outcome, SubmitOutcome::LessonStarted);
    assert_eq!(session.phase(), TutorPhase::Narrating);

    for _ in 0..4 {
        assert_eq!(h.service.next(&mut session).await, NavOutcome::Rendered);
    }
    assert_eq!(h.service.next(&mut session).await, NavOutcome::Finished);

    assert_eq!(session.phase(), TutorPhase::Idle);
    assert_eq!(session.progress().stars(), 1);
    assert_eq!(h.celebration.count(), 1);
    assert!(h.sounds.cues().contains(&SoundCue::Win));
    assert_eq!(step_positions(&h.renderer), vec![1, 2, 3, 4, 5]);

    let saved = h.store.get_progress().await.unwrap().expect("persisted");
    assert_eq!(saved.stars(), 1);
}

#[tokio::test]
async fn quiz_gate_pays_the_star_before_the_walkthrough() {
    let h = harness();
    let mut session = h.service.new_session().await;

    let outcome = h
        .service
        .submit(&mut session, Operation::Multiply, 3, 4, true)
        .await;
    assert_eq!(outcome, SubmitOutcome::AwaitingAnswer);
    assert_eq!(session.phase(), TutorPhase::Quizzing);

    let wrong = wrong_choice(session.round().expect("gate question up"));
    assert_eq!(h.service.answer(&mut session, wrong).await, AnswerOutcome::Wrong);
    assert_eq!(session.progress().stars(), 0);
    assert!(session.round().unwrap().disabled()[wrong]);

    let correct = correct_choice(session.round().unwrap());
    assert_eq!(
        h.service.answer(&mut session, correct).await,
        AnswerOutcome::LessonStarted
    );
    assert_eq!(session.progress().stars(), 1);
    assert_eq!(session.phase(), TutorPhase::Narrating);

    for _ in 0..4 {
        assert_eq!(h.service.next(&mut session).await, NavOutcome::Rendered);
    }
    assert_eq!(h.service.next(&mut session).await, NavOutcome::Finished);

    // The gate already paid out; finishing does not double-count.
    assert_eq!(session.progress().stars(), 1);
    assert_eq!(h.celebration.count(), 1);
    let saved = h.store.get_progress().await.unwrap().expect("persisted");
    assert_eq!(saved.stars(), 1);
}

#[tokio::test]
async fn oversized_numbers_are_refused() {
    let h = harness();
    let mut session = h.service.new_session().await;

    let outcome = h
        .service
        .submit(&mut session, Operation::Multiply, 100_000, 100_000, false)
        .await;

    assert_eq!(outcome, SubmitOutcome::Refused);
    assert_eq!(session.phase(), TutorPhase::Idle);
    let messages = h.renderer.messages();
    assert!(messages[0].contains("too big"));
}

#[tokio::test]
async fn daily_challenge_completes_and_extends_the_streak() {
    let h = harness();
    let mut session = h.service.new_session().await;

    h.service.start_daily(&mut session).await;
    assert_eq!(session.phase(), TutorPhase::Quizzing);

    for answered in 1u8..=5 {
        let choice = correct_choice(session.round().expect("question up"));
        let outcome = h.service.answer(&mut session, choice).await;
        if answered < 5 {
            assert_eq!(outcome, AnswerOutcome::NextQuestion);
            assert_eq!(session.progress().daily_correct(), answered);
        } else {
            assert_eq!(
                outcome,
                AnswerOutcome::DailyCompleted {
                    streak_extended: true
                }
            );
        }
    }

    assert_eq!(session.phase(), TutorPhase::Idle);
    assert_eq!(session.progress().daily_streak(), 1);
    assert_eq!(session.progress().stars(), 5);

    // A sixth answer after completion falls on deaf ears.
    assert_eq!(h.service.answer(&mut session, 0).await, AnswerOutcome::Ignored);

    let saved = h.store.get_progress().await.unwrap().expect("persisted");
    assert_eq!(saved.daily_streak(), 1);
    assert_eq!(saved.last_daily_completion(), Some(fixed_today()));
}

#[tokio::test]
async fn wrong_answers_do_not_advance_the_daily_count() {
    let h = harness();
    let mut session = h.service.new_session().await;

    h.service.start_daily(&mut session).await;

    let wrong = wrong_choice(session.round().expect("question up"));
    assert_eq!(h.service.answer(&mut session, wrong).await, AnswerOutcome::Wrong);
    assert_eq!(session.progress().daily_correct(), 0);

    let correct = correct_choice(session.round().unwrap());
    assert_eq!(
        h.service.answer(&mut session, correct).await,
        AnswerOutcome::NextQuestion
    );
    assert_eq!(session.progress().daily_correct(), 1);
}

#[tokio::test]
async fn play_runs_the_walkthrough_to_the_end() {
    let h = harness();
    let mut session = h.service.new_session().await;

    h.service
        .submit(&mut session, Operation::Divide, 7, 2, false)
        .await;
    assert_eq!(h.service.play(&mut session).await, NavOutcome::Finished);

    assert_eq!(session.phase(), TutorPhase::Idle);
    assert_eq!(session.progress().stars(), 1);
    assert_eq!(step_positions(&h.renderer).last(), Some(&5));
}

#[tokio::test]
async fn storage_failures_keep_the_session_alive() {
    struct FailingRepo;

    #[async_trait]
    impl ProgressRepository for FailingRepo {
        async fn get_progress(&self) -> Result<Option<Progress>, StorageError> {
            Err(StorageError::Connection("no disk".into()))
        }

        async fn save_progress(&self, _progress: &Progress) -> Result<(), StorageError> {
            Err(StorageError::Connection("no disk".into()))
        }
    }

    let renderer = RecordingRenderer::new();
    let speech = SpeechService::new(Arc::new(SilentNarrator), Arc::new(NullSpeakingIndicator));
    let service = TutorLoopService::new(
        fixed_clock(),
        speech,
        Arc::new(renderer.clone()),
        Arc::new(RecordingSoundEffects::new()),
        Arc::new(RecordingCelebrationEffect::new()),
        ProgressLedger::new(Arc::new(FailingRepo)),
    )
    .with_pacing(Pacing::ZERO);

    let mut session = service.new_session().await;
    assert_eq!(session.progress().stars(), 0);

    service
        .submit(&mut session, Operation::Add, 2, 2, false)
        .await;
    while service.next(&mut session).await == NavOutcome::Rendered {}

    // The star still lands in memory even though every save failed.
    assert_eq!(session.progress().stars(), 1);
    assert_eq!(session.phase(), TutorPhase::Idle);
}

#[tokio::test]
async fn app_services_wire_the_full_stack() {
    let storage = Storage::in_memory();
    let renderer = RecordingRenderer::new();
    let ports = TutorPorts {
        renderer: Arc::new(renderer.clone()),
        narrator: Arc::new(SilentNarrator),
        audio: Arc::new(NullAudioSink),
        sounds: Arc::new(RecordingSoundEffects::new()),
        indicator: Arc::new(NullSpeakingIndicator),
        celebration: Arc::new(RecordingCelebrationEffect::new()),
    };

    let services = AppServices::with_storage(storage.clone(), fixed_clock(), ports)
        .await
        .unwrap();

    let draft = NarratorSettingsDraft {
        api_key: Some("sk-live".to_string()),
        api_base_url: None,
        voice: VoicePreference::Male,
    };
    services.settings().save(draft).await.unwrap();
    let loaded = services.settings().load().await.unwrap();
    assert!(loaded.premium_enabled());

    let tutor = services.tutor();
    let mut session = tutor.new_session().await;
    let outcome = tutor
        .submit(&mut session, Operation::Subtract, 9, 4, false)
        .await;
    assert_eq!(outcome, SubmitOutcome::LessonStarted);
    assert!(!renderer.events().is_empty());
}
