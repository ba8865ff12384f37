//! End-to-end rip and encode through real subprocesses.
//!
//! Shell scripts stand in for makemkvcon and HandBrakeCLI, speaking the
//! same progress protocols and writing files where the real tools would.

#![cfg(unix)]

mod common;

use common::{title, write_script, FakeScanner, TestApp};
use ripforge::session::{Event, Outcome, SessionState};
use std::path::PathBuf;

const FAKE_MAKEMKV: &str = r#"
for last; do :; done
echo PRGV:50,0,100
echo 'PRGT:5018,0,"Saving all titles to MKV files"'
touch "$last/title_t$(printf %02d "$5").mkv"
exit 0
"#;

const FAKE_HANDBRAKE: &str = r#"
echo '{"Progress": {"State": "WORKING", "Working": {"Percent": 50.0, "Rate": 100.0, "RateAvg": 90.0, "ETASeconds": 30}}}'
echo 'Encoding: task 1 of 1, 99.50 % (120.00 fps, avg 95.00 fps, ETA 00h00m01s)'
touch "$4"
exit 0
"#;

fn two_title_disc() -> FakeScanner {
    FakeScanner::with_titles(vec![title(0, "25.4 GB"), title(1, "2.1 GB")])
}

#[test]
fn rip_one_title_then_encode() {
    let scripts = tempfile::tempdir().unwrap();
    let makemkv = write_script(scripts.path(), "makemkvcon", FAKE_MAKEMKV);
    let handbrake = write_script(scripts.path(), "HandBrakeCLI", FAKE_HANDBRAKE);
    let mut t = TestApp::new(two_title_disc(), makemkv, handbrake);

    assert_eq!(t.app.session().state(), SessionState::DiscSelection);
    t.app.dispatch(Event::LoadTitles);
    assert_eq!(t.app.session().titles().len(), 2);

    // Select idx 0 only.
    t.app.dispatch(Event::ToggleTitle);
    t.app.dispatch(Event::StartRip);
    assert_eq!(t.app.session().state(), SessionState::Ripping);
    t.wait_idle();

    let session = t.app.session();
    assert_eq!(session.state(), SessionState::Ripping);
    assert_eq!(session.ripped_files().len(), 1);
    assert_eq!(session.ripped_files()[0].title_number, 0);
    assert_eq!(session.ripped_files()[0].output_name, "title_t00.mkv");

    let rip = t.app.view().rip;
    assert_eq!(rip.percent, 50.0);
    assert_eq!((rip.current_item, rip.total_items), (1, 1));
    assert_eq!(rip.status_text, "Saving all titles to MKV files");

    t.app.dispatch(Event::StartEncode);
    assert_eq!(t.app.session().state(), SessionState::Encoding);
    t.wait_idle();

    assert_eq!(
        t.app.session().state(),
        SessionState::Completed(Outcome::Succeeded)
    );
    assert!(t.output.join("encoded/title_t00.mkv").exists());

    let enc = t.app.view().encode;
    assert_eq!(enc.percent, 99.5);
    assert_eq!(enc.avg_fps, 95.0);
    assert_eq!(enc.eta.as_deref(), Some("00:00:01"));
}

#[test]
fn failing_title_stops_the_rip_batch() {
    let scripts = tempfile::tempdir().unwrap();
    let attempts = scripts.path().join("attempts");
    let body = format!(
        "for last; do :; done\necho \"$5\" >> '{}'\n[ \"$5\" = 1 ] && exit 1\ntouch \"$last/title_t0$5.mkv\"\n",
        attempts.display()
    );
    let makemkv = write_script(scripts.path(), "makemkvcon", &body);
    let scanner =
        FakeScanner::with_titles(vec![title(0, "1 GB"), title(1, "1 GB"), title(2, "1 GB")]);
    let mut t = TestApp::new(scanner, makemkv, PathBuf::from("HandBrakeCLI"));

    t.app.dispatch(Event::LoadTitles);
    t.app.dispatch(Event::SelectAllTitles);
    t.app.dispatch(Event::StartRip);
    t.wait_idle();

    assert_eq!(
        t.app.session().state(),
        SessionState::Completed(Outcome::Failed)
    );
    assert_eq!(std::fs::read_to_string(&attempts).unwrap(), "0\n1\n");
    assert!(t.output.join("title_t00.mkv").exists());
    assert!(!t.output.join("title_t02.mkv").exists());
}

#[test]
fn missing_tool_fails_the_batch_without_progress() {
    let mut t = TestApp::new(
        two_title_disc(),
        PathBuf::from("/nonexistent/makemkvcon"),
        PathBuf::from("/nonexistent/HandBrakeCLI"),
    );

    t.app.dispatch(Event::LoadTitles);
    t.app.dispatch(Event::ToggleTitle);
    t.app.dispatch(Event::StartRip);
    t.wait_idle();

    assert_eq!(
        t.app.session().state(),
        SessionState::Completed(Outcome::Failed)
    );
    assert_eq!(t.app.view().rip.percent, 0.0);
    assert!(t
        .app
        .session()
        .log()
        .entries()
        .any(|e| e.message.contains("failed to spawn makemkvcon")));
}

#[test]
fn output_directory_failure_aborts_before_spawning() {
    let scripts = tempfile::tempdir().unwrap();
    let marker = scripts.path().join("spawned");
    let makemkv = write_script(
        scripts.path(),
        "makemkvcon",
        &format!("touch '{}'", marker.display()),
    );
    let mut t = TestApp::new(two_title_disc(), makemkv, PathBuf::from("HandBrakeCLI"));
    std::fs::write(&t.output, "not a directory").unwrap();

    t.app.dispatch(Event::LoadTitles);
    t.app.dispatch(Event::ToggleTitle);
    t.app.dispatch(Event::StartRip);
    t.wait_idle();

    assert_eq!(
        t.app.session().state(),
        SessionState::Completed(Outcome::Failed)
    );
    assert!(!marker.exists());
}
