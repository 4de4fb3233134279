//! Optimistic Sync Controller Tests
//!
//! Drive the controller against an in-memory store wrapped with call
//! recording and failure injection. Tokio time is paused, so debounce
//! timers fire deterministically: the runtime jumps the clock forward
//! whenever every task is waiting on a timer.

#[cfg(test)]
mod sync_controller_tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use coursedesk_core::operations::Direction;
    use coursedesk_core::store::{ReorderContentRequest, ReorderLessonsRequest};
    use coursedesk_core::{
        ContentItem, ContentStore, Course, InMemoryContentStore, Lesson, Module, Section,
        StoreError, SyncConfig, SyncController, SyncError, SyncEvent, SyncState,
    };
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::broadcast;
    use tokio::time::{sleep, timeout, Duration};

    const DEBOUNCE: Duration = Duration::from_millis(1000);

    /// In-memory store that records calls and can be told to fail
    #[derive(Default)]
    struct RecordingStore {
        inner: InMemoryContentStore,
        module_calls: Mutex<Vec<(String, ReorderContentRequest)>>,
        lesson_calls: Mutex<Vec<(String, ReorderLessonsRequest)>>,
        fetches: AtomicUsize,
        in_flight: AtomicUsize,
        fail_persist: AtomicBool,
        fail_fetch: AtomicBool,
        persist_delay: Mutex<Option<Duration>>,
    }

    impl RecordingStore {
        fn module_calls(&self) -> Vec<(String, ReorderContentRequest)> {
            self.module_calls.lock().unwrap().clone()
        }

        fn lesson_calls(&self) -> Vec<(String, ReorderLessonsRequest)> {
            self.lesson_calls.lock().unwrap().clone()
        }

        async fn before_persist(&self) -> Result<(), StoreError> {
            let delay = *self.persist_delay.lock().unwrap();
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            if self.fail_persist.load(Ordering::SeqCst) {
                return Err(StoreError::transport("connection reset by peer"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ContentStore for RecordingStore {
        async fn fetch_course(&self, course_id: &str) -> Result<Course, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(StoreError::transport("connection refused"));
            }
            self.inner.fetch_course(course_id).await
        }

        async fn persist_module_order(
            &self,
            course_id: &str,
            module_id: &str,
            request: &ReorderContentRequest,
        ) -> Result<Course, StoreError> {
            self.module_calls
                .lock()
                .unwrap()
                .push((module_id.to_string(), request.clone()));
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            let result = match self.before_persist().await {
                Ok(()) => {
                    self.inner
                        .persist_module_order(course_id, module_id, request)
                        .await
                }
                Err(err) => Err(err),
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }

        async fn persist_section_lessons(
            &self,
            course_id: &str,
            module_id: &str,
            section_id: &str,
            request: &ReorderLessonsRequest,
        ) -> Result<Course, StoreError> {
            self.lesson_calls
                .lock()
                .unwrap()
                .push((section_id.to_string(), request.clone()));
            self.before_persist().await?;
            self.inner
                .persist_section_lessons(course_id, module_id, section_id, request)
                .await
        }
    }

    /// Module m1: [A(section: X, Y, Z), B(lesson), C(lesson)]; module m2: [D, E]
    fn seed_course() -> Course {
        Course::new_with_id("course-1", "Trading Signals Academy").with_modules(vec![
            Module::new_with_id("m1", "Market Structure", "Highs, lows and trends")
                .with_sections(vec![Section::new_with_id("A", "Swing points")
                    .with_order(1)
                    .with_lessons(vec![
                        Lesson::new_with_id("X", "Higher highs").with_order(1),
                        Lesson::new_with_id("Y", "Lower lows").with_order(2),
                        Lesson::new_with_id("Z", "Ranges").with_order(3),
                    ])])
                .with_lessons(vec![
                    Lesson::new_with_id("B", "Break of structure").with_order(2),
                    Lesson::new_with_id("C", "Change of character").with_order(3),
                ]),
            Module::new_with_id("m2", "Risk", "Position sizing").with_lessons(vec![
                Lesson::new_with_id("D", "Stops").with_order(1),
                Lesson::new_with_id("E", "Targets").with_order(2),
            ]),
        ])
    }

    /// Module m1 gains a second section S2 [P, Q] at the end of its content
    fn two_section_course() -> Course {
        let mut course = seed_course();
        let module = course.module_mut("m1").unwrap();
        module.sections.push(
            Section::new_with_id("S2", "Liquidity")
                .with_order(4)
                .with_lessons(vec![
                    Lesson::new_with_id("P", "Order blocks").with_order(1),
                    Lesson::new_with_id("Q", "Stop hunts").with_order(2),
                ]),
        );
        course
    }

    async fn setup() -> Result<(Arc<RecordingStore>, SyncController<RecordingStore>)> {
        setup_with(seed_course()).await
    }

    async fn setup_with(
        course: Course,
    ) -> Result<(Arc<RecordingStore>, SyncController<RecordingStore>)> {
        let store = Arc::new(RecordingStore::default());
        store.inner.insert_course(course)?;

        let config = SyncConfig {
            debounce_ms: DEBOUNCE.as_millis() as u64,
            ..Default::default()
        };
        let controller = SyncController::open(store.clone(), "course-1", &config).await?;
        Ok((store, controller))
    }

    fn ids(items: &[ContentItem]) -> Vec<String> {
        items.iter().map(|item| item.id().to_string()).collect()
    }

    fn lesson_ids(lessons: &[Lesson]) -> Vec<String> {
        lessons.iter().map(|lesson| lesson.id.clone()).collect()
    }

    fn section_lesson_ids(course: &Course, module_id: &str, section_id: &str) -> Vec<String> {
        let section = course.module(module_id).unwrap().section(section_id).unwrap();
        lesson_ids(&section.sorted_lessons())
    }

    /// Wait for the first event matching `predicate`
    async fn wait_for(
        rx: &mut broadcast::Receiver<SyncEvent>,
        predicate: impl Fn(&SyncEvent) -> bool,
    ) -> SyncEvent {
        timeout(Duration::from_secs(60), async {
            loop {
                let event = rx.recv().await.expect("event channel closed");
                if predicate(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("event should arrive")
    }

    /// Every started module request completed and m1 is back to Idle
    async fn wait_settled(store: &RecordingStore, controller: &SyncController<RecordingStore>) {
        timeout(Duration::from_secs(5), async {
            while store.in_flight.load(Ordering::SeqCst) > 0
                || controller.has_pending("m1")
                || controller.state("m1") != SyncState::Idle
            {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("module should settle with no request left hanging");
    }

    fn is_synced(module: &'static str) -> impl Fn(&SyncEvent) -> bool {
        move |event| matches!(event, SyncEvent::Synced { module_id, .. } if module_id == module)
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_apply_is_immediate() -> Result<()> {
        let (store, controller) = setup().await?;

        let items = controller.reorder_module_content("m1", 2, 0)?;

        assert_eq!(ids(&items), vec!["C", "A", "B"]);
        let local = controller.module_content("m1").unwrap();
        assert_eq!(ids(&local), vec!["C", "A", "B"]);
        assert_eq!(controller.state("m1"), SyncState::LocalApplied);
        assert!(controller.has_pending("m1"));
        assert!(store.module_calls().is_empty(), "persist must wait for debounce");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_drags_persists_once_with_final_state() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();

        // Three drags, each inside the previous drag's debounce window
        controller.reorder_module_content("m1", 2, 0)?; // C A B
        sleep(Duration::from_millis(400)).await;
        controller.reorder_module_content("m1", 2, 1)?; // C B A
        sleep(Duration::from_millis(400)).await;
        controller.reorder_module_content("m1", 0, 2)?; // B A C
        sleep(Duration::from_millis(400)).await;
        assert!(store.module_calls().is_empty());

        wait_for(&mut rx, is_synced("m1")).await;

        let calls = store.module_calls();
        assert_eq!(calls.len(), 1, "exactly one persist for the burst");
        assert_eq!(calls[0].0, "m1");
        assert_eq!(ids(&calls[0].1.ordered_items), vec!["B", "A", "C"]);

        let server = store.inner.fetch_course("course-1").await?;
        let server_ids = ids(&server.module("m1").unwrap().content_items());
        assert_eq!(server_ids, vec!["B", "A", "C"]);
        assert_eq!(controller.state("m1"), SyncState::Idle);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_replaces_module_with_server_copy() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();

        // The server owns titles; rename behind the controller's back
        let mut renamed = seed_course();
        renamed.modules[0].lessons[0].title = "Break of structure (updated)".to_string();
        store.inner.insert_course(renamed)?;

        controller.reorder_module_content("m1", 0, 2)?;
        let event = wait_for(&mut rx, is_synced("m1")).await;

        let local = controller.course();
        let lesson_b = local.module("m1").unwrap().lessons.iter().find(|l| l.id == "B");
        assert_eq!(lesson_b.unwrap().title, "Break of structure (updated)");
        assert!(local.updated_at.is_some());
        match event {
            SyncEvent::Synced { course, .. } => assert_eq!(course.id, "course-1"),
            other => panic!("Expected Synced, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_persist_reverts_to_refetched_truth() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();
        store.fail_persist.store(true, Ordering::SeqCst);

        controller.reorder_module_content("m1", 2, 0)?;
        assert_eq!(ids(&controller.module_content("m1").unwrap()), vec!["C", "A", "B"]);

        let failed = wait_for(&mut rx, |e| matches!(e, SyncEvent::PersistFailed { .. })).await;
        assert_eq!(failed.module_id(), "m1");
        wait_for(&mut rx, |e| matches!(e, SyncEvent::Reverted { .. })).await;

        // Snapped back to server order, not left in the optimistic state
        assert_eq!(ids(&controller.module_content("m1").unwrap()), vec!["A", "B", "C"]);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2, "open + revert refetch");
        assert_eq!(store.module_calls().len(), 1, "no automatic retry");
        assert_eq!(controller.state("m1"), SyncState::Idle);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refetch_is_reported_not_fatal() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();
        store.fail_persist.store(true, Ordering::SeqCst);
        store.fail_fetch.store(true, Ordering::SeqCst);

        controller.reorder_module_content("m1", 2, 0)?;
        wait_for(&mut rx, |e| matches!(e, SyncEvent::RefetchFailed { .. })).await;

        assert_eq!(controller.state("m1"), SyncState::Idle);

        // The view stays usable and the next action starts a fresh cycle
        store.fail_persist.store(false, Ordering::SeqCst);
        controller.reorder_module_content("m1", 0, 1)?;
        wait_for(&mut rx, is_synced("m1")).await;
        assert_eq!(store.module_calls().len(), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_module_timers_are_independent() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();

        controller.reorder_module_content("m1", 2, 0)?;
        sleep(Duration::from_millis(600)).await;
        // Reordering m2 must not restart m1's timer
        controller.reorder_module_content("m2", 1, 0)?;

        wait_for(&mut rx, is_synced("m1")).await;
        assert_eq!(store.module_calls().len(), 1);
        assert!(controller.has_pending("m2"));

        wait_for(&mut rx, is_synced("m2")).await;
        let calls = store.module_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "m2");
        assert_eq!(ids(&calls[1].1.ordered_items), vec!["E", "D"]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_persist_keeps_other_modules_pending_changes() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();
        store.fail_persist.store(true, Ordering::SeqCst);

        controller.reorder_module_content("m1", 2, 0)?;
        sleep(Duration::from_millis(600)).await;
        controller.reorder_module_content("m2", 1, 0)?;

        wait_for(&mut rx, |e| matches!(e, SyncEvent::Reverted { .. })).await;

        // m1 reverted, m2 still holds its unpersisted drag
        assert_eq!(ids(&controller.module_content("m1").unwrap()), vec!["A", "B", "C"]);
        assert_eq!(ids(&controller.module_content("m2").unwrap()), vec!["E", "D"]);
        assert!(controller.has_pending("m2"));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_persist_is_not_cancelled() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();
        *store.persist_delay.lock().unwrap() = Some(Duration::from_millis(200));

        controller.reorder_module_content("m1", 2, 0)?; // C A B
        // Timer fires at 1000ms; the request is still in flight at 1100ms
        sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.module_calls().len(), 1);
        controller.reorder_module_content("m1", 2, 1)?; // C B A

        wait_for(&mut rx, is_synced("m1")).await;
        // First answer arrived while a newer drag was pending: local order kept
        assert_eq!(ids(&controller.module_content("m1").unwrap()), vec!["C", "B", "A"]);
        assert_eq!(controller.state("m1"), SyncState::LocalApplied);

        wait_for(&mut rx, is_synced("m1")).await;
        let calls = store.module_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(ids(&calls[0].1.ordered_items), vec!["C", "A", "B"]);
        assert_eq!(ids(&calls[1].1.ordered_items), vec!["C", "B", "A"]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_move_persists_immediately() -> Result<()> {
        let (store, controller) = setup().await?;

        let outcome = controller
            .move_section_lesson("m1", "A", 1, Direction::Up)
            .await?;

        assert_eq!(lesson_ids(&outcome.into_items()), vec!["Y", "X", "Z"]);
        let calls = store.lesson_calls();
        assert_eq!(calls.len(), 1, "no debounce for arrow moves");
        assert_eq!(calls[0].0, "A");
        assert_eq!(lesson_ids(&calls[0].1.lessons), vec!["Y", "X", "Z"]);

        let server = store.inner.fetch_course("course-1").await?;
        assert_eq!(section_lesson_ids(&server, "m1", "A"), vec!["Y", "X", "Z"]);
        assert_eq!(controller.state("m1"), SyncState::Idle);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_arrow_click_is_its_own_cycle() -> Result<()> {
        let (store, controller) = setup().await?;

        controller.move_section_lesson("m1", "A", 0, Direction::Down).await?;
        controller.move_section_lesson("m1", "A", 1, Direction::Down).await?;

        assert_eq!(store.lesson_calls().len(), 2);
        let local = controller.course();
        assert_eq!(section_lesson_ids(&local, "m1", "A"), vec!["Y", "Z", "X"]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_boundary_sends_nothing() -> Result<()> {
        let (store, controller) = setup().await?;
        let before = controller.course();

        let top = controller.move_section_lesson("m1", "A", 0, Direction::Up).await?;
        let bottom = controller.move_section_lesson("m1", "A", 2, Direction::Down).await?;

        assert!(top.is_boundary());
        assert!(bottom.is_boundary());
        assert!(store.lesson_calls().is_empty());
        assert_eq!(controller.course(), before);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrow_failure_reverts() -> Result<()> {
        let (store, controller) = setup().await?;
        store.fail_persist.store(true, Ordering::SeqCst);

        controller.move_section_lesson("m1", "A", 1, Direction::Up).await?;

        let local = controller.course();
        assert_eq!(section_lesson_ids(&local, "m1", "A"), vec!["X", "Y", "Z"]);
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_section_drag_is_debounced() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();

        controller.reorder_section_lessons("m1", "A", 0, 2)?; // Y Z X
        controller.reorder_section_lessons("m1", "A", 0, 1)?; // Z Y X
        assert!(store.lesson_calls().is_empty());

        wait_for(&mut rx, is_synced("m1")).await;
        let calls = store.lesson_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(lesson_ids(&calls[0].1.lessons), vec!["Z", "Y", "X"]);
        assert!(store.module_calls().is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_persists_without_waiting() -> Result<()> {
        let (store, controller) = setup().await?;

        controller.reorder_module_content("m2", 1, 0)?;
        controller.flush("m2").await;

        assert_eq!(store.module_calls().len(), 1);
        assert!(!controller.has_pending("m2"));

        // The aborted timer must not persist a second time
        sleep(DEBOUNCE * 2).await;
        assert_eq!(store.module_calls().len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_everything() -> Result<()> {
        let (store, controller) = setup().await?;

        controller.reorder_module_content("m1", 2, 0)?;
        controller.reorder_module_content("m2", 1, 0)?;
        let final_course = controller.close().await;

        assert_eq!(store.module_calls().len(), 2);
        let server = store.inner.fetch_course("course-1").await?;
        assert_eq!(
            final_course.module("m2").unwrap().content_items(),
            server.module("m2").unwrap().content_items()
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_index_is_rejected_without_side_effects() -> Result<()> {
        let (store, controller) = setup().await?;
        let before = controller.course();

        assert!(controller.reorder_module_content("m1", 3, 0).is_err());
        assert!(controller.reorder_module_content("missing", 0, 0).is_err());
        assert!(controller
            .move_section_lesson("m1", "A", 7, Direction::Down)
            .await
            .is_err());

        assert_eq!(controller.course(), before);
        assert!(!controller.has_pending("m1"));
        assert_eq!(controller.state("m1"), SyncState::Idle);
        sleep(DEBOUNCE * 2).await;
        assert!(store.module_calls().is_empty());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_noop_resubmission_keeps_server_order() -> Result<()> {
        let (store, controller) = setup().await?;
        let mut rx = controller.subscribe();
        let before = store.inner.fetch_course("course-1").await?;

        // Dragging an item onto itself still persists, but changes nothing
        controller.reorder_module_content("m1", 1, 1)?;
        wait_for(&mut rx, is_synced("m1")).await;

        let after = store.inner.fetch_course("course-1").await?;
        assert_eq!(
            after.module("m1").unwrap().content_items(),
            before.module("m1").unwrap().content_items()
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_keeps_pending_modules() -> Result<()> {
        let (store, controller) = setup().await?;

        let mut changed = seed_course();
        changed.title = "Renamed upstream".to_string();
        store.inner.insert_course(changed)?;

        controller.reorder_module_content("m1", 2, 0)?;
        controller.refresh().await?;

        let local = controller.course();
        assert_eq!(local.title, "Renamed upstream");
        assert_eq!(ids(&local.module("m1").unwrap().content_items()), vec!["C", "A", "B"]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_arrow_move_reverts_section_beside_pending_drag() -> Result<()> {
        let (store, controller) = setup_with(two_section_course()).await?;
        let mut rx = controller.subscribe();

        // Pending drag covers S2 only
        controller.reorder_section_lessons("m1", "S2", 0, 1)?;

        store.fail_persist.store(true, Ordering::SeqCst);
        controller.move_section_lesson("m1", "A", 1, Direction::Up).await?;
        store.fail_persist.store(false, Ordering::SeqCst);

        // The rejected section snaps back, the pending one keeps its drag
        let local = controller.course();
        assert_eq!(section_lesson_ids(&local, "m1", "A"), vec!["X", "Y", "Z"]);
        assert_eq!(section_lesson_ids(&local, "m1", "S2"), vec!["Q", "P"]);
        assert!(controller.has_pending("m1"));

        wait_for(&mut rx, is_synced("m1")).await;

        let local = controller.course();
        let server = store.inner.fetch_course("course-1").await?;
        assert_eq!(section_lesson_ids(&local, "m1", "A"), vec!["X", "Y", "Z"]);
        assert_eq!(section_lesson_ids(&server, "m1", "A"), vec!["X", "Y", "Z"]);
        assert_eq!(section_lesson_ids(&server, "m1", "S2"), vec!["Q", "P"]);
        assert_eq!(local.module("m1"), server.module("m1"));
        assert_eq!(controller.state("m1"), SyncState::Idle);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_content_persist_keeps_only_newer_section_drag() -> Result<()> {
        let (store, controller) = setup_with(two_section_course()).await?;
        let mut rx = controller.subscribe();
        *store.persist_delay.lock().unwrap() = Some(Duration::from_millis(200));
        store.fail_persist.store(true, Ordering::SeqCst);

        controller.reorder_module_content("m1", 3, 0)?; // S2 A B C
        // Content persist in flight from 1000ms to 1200ms
        sleep(Duration::from_millis(1100)).await;
        controller.reorder_section_lessons("m1", "S2", 0, 1)?;

        wait_for(&mut rx, |e| matches!(e, SyncEvent::Reverted { .. })).await;

        let local = controller.course();
        let content = ids(&local.module("m1").unwrap().content_items());
        assert_eq!(content, vec!["A", "B", "C", "S2"]);
        assert_eq!(section_lesson_ids(&local, "m1", "S2"), vec!["Q", "P"]);
        assert!(controller.has_pending("m1"));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_flush_racing_timer_never_cancels_a_claimed_persist() -> Result<()> {
        let store = Arc::new(RecordingStore::default());
        store.inner.insert_course(seed_course())?;
        *store.persist_delay.lock().unwrap() = Some(Duration::from_millis(1));
        let config = SyncConfig {
            debounce_ms: 1,
            ..Default::default()
        };
        let controller = SyncController::open(store.clone(), "course-1", &config).await?;

        for round in 0..200 {
            controller.reorder_module_content("m1", round % 3, (round + 1) % 3)?;
            // Lands on or around the timer deadline
            sleep(Duration::from_millis(1)).await;
            controller.flush("m1").await;
        }
        controller.flush_all().await;
        wait_settled(&store, &controller).await;

        // A final drag after the burst lands on the server
        controller.reorder_module_content("m1", 0, 2)?;
        controller.flush("m1").await;
        wait_settled(&store, &controller).await;

        let server = store.inner.fetch_course("course-1").await?;
        let local = controller.course();
        assert_eq!(
            ids(&local.module("m1").unwrap().content_items()),
            ids(&server.module("m1").unwrap().content_items())
        );
        assert_eq!(controller.state("m1"), SyncState::Idle);
        Ok(())
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_config() -> Result<()> {
        let store = Arc::new(RecordingStore::default());
        store.inner.insert_course(seed_course())?;
        let config = SyncConfig {
            debounce_ms: 10 * 60 * 1000,
            ..Default::default()
        };

        let result = SyncController::open(store.clone(), "course-1", &config).await;

        assert!(matches!(result, Err(SyncError::Config(_))));
        assert_eq!(store.fetches.load(Ordering::SeqCst), 0);
        Ok(())
    }
}
