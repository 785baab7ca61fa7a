// tests/pipeline_test.rs

use clap::Parser;
use mockito::{Mock, ServerGuard};
use nagwa_dl::{
    DownloadJobContext,
    cli::Cli,
    config::AppConfig,
    downloader::{CourseDownloader, DownloadStats},
    models::{AssetKind, AssetOutcome},
    run_job,
};
use std::{fs, path::Path, sync::Arc};
use tempfile::tempdir;

const GRADE_PAGE: &str = include_str!("fixtures/grade.html");
const COURSE_PAGE: &str = include_str!("fixtures/course.html");
const LESSON_PAGE: &str = include_str!("fixtures/lesson.html");
const VIDEO_PAGE: &str = include_str!("fixtures/video.html");
const PRESENTATION_PAGE: &str = include_str!("fixtures/presentation.html");
const PLAYLIST_PAGE: &str = include_str!("fixtures/playlist.html");
const SLIDE_SVG: &str = include_str!("fixtures/slide.svg");

fn player_page(src: &str) -> String {
    format!(
        r#"<html><body><div id="NagwaLitePlayer"><video><source src="{}"></video></div></body></html>"#,
        src
    )
}

/// 返回的 `Mock` 被丢弃时会从服务器上移除，调用方需要持有它
async fn page_hit(server: &mut ServerGuard, path: &str, body: &str, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

async fn page(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    page_hit(server, path, body, 1).await
}

/// 站点上所有页面的 mock，按两次运行设定请求次数；资源只允许被请求一次
struct Site {
    grade: Mock,
    course: Mock,
    lesson: Mock,
    assets: Vec<Mock>,
}

async fn mock_site(server: &mut ServerGuard) -> Site {
    let grade = page_hit(server, "/grades/11/", GRADE_PAGE, 2).await;
    let course = page_hit(server, "/courses/physics/", COURSE_PAGE, 2).await;
    let lesson = page_hit(server, "/lessons/1/", LESSON_PAGE, 1).await;

    let mut assets = Vec::new();
    for (path, body) in [
        ("/videos/1/", VIDEO_PAGE.to_string()),
        ("/media/lesson-720.mp4", "LESSON-VIDEO".to_string()),
        ("/subs/ar.vtt", "WEBVTT\n\nمرحبا".to_string()),
        ("/subs/en.vtt", "WEBVTT\n\nHello".to_string()),
        ("/presentations/1/", PRESENTATION_PAGE.to_string()),
        ("/slides/1.svg", SLIDE_SVG.to_string()),
        ("/slides/2.svg", SLIDE_SVG.to_string()),
        ("/playlists/1/", PLAYLIST_PAGE.to_string()),
        ("/videos/q1/", player_page("/media/q1.mp4")),
        ("/videos/q2/", player_page("/media/q2.mp4")),
        ("/videos/q3/", "<html><body><p>removed</p></body></html>".to_string()),
        ("/media/q1.mp4", "QUESTION-1".to_string()),
        ("/media/q2.mp4", "QUESTION-2".to_string()),
    ] {
        assets.push(
            server
                .mock("GET", path)
                .with_status(200)
                .with_body(body)
                .expect(1)
                .create_async()
                .await,
        );
    }
    Site {
        grade,
        course,
        lesson,
        assets,
    }
}

fn context_for(server_url: &str, output: &Path, extra_args: &[&str]) -> DownloadJobContext {
    let mut argv = vec!["nagwa-dl", "-g", "11", "-c", "Physics", "-o"];
    let output_str = output.to_str().unwrap();
    argv.push(output_str);
    argv.extend_from_slice(extra_args);
    let args = Arc::new(Cli::parse_from(argv));

    let config = Arc::new(AppConfig {
        grade_url_template: format!("{}/grades/{{grade}}/", server_url),
        courses: vec!["Physics".to_string()],
        output_dir: output.to_path_buf(),
        ..AppConfig::default()
    });
    DownloadJobContext::new(args, config).expect("Failed to build context")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_run_writes_layout_and_second_run_fetches_nothing() {
    let mut server = mockito::Server::new_async().await;
    let site = mock_site(&mut server).await;
    let output = tempdir().unwrap();
    let lesson_dir = output.path().join("Physics/Unit 1 Mechanics/Motion");

    // --- 第一次运行: 下载全部资源 ---
    let context = context_for(&server.url(), output.path(), &[]);
    run_job(&context).await.expect("run should succeed");

    assert_eq!(
        fs::read(lesson_dir.join("Lesson Video/Video.mp4")).unwrap(),
        b"LESSON-VIDEO"
    );
    assert_eq!(
        fs::read_to_string(lesson_dir.join("Lesson Video/subtitle_en.vtt")).unwrap(),
        "WEBVTT\n\nHello"
    );
    assert!(lesson_dir.join("Lesson Video/subtitle_ar.vtt").is_file());

    let pdf_bytes = fs::read(lesson_dir.join("Presentation")).unwrap();
    let pdf = lopdf::Document::load_mem(&pdf_bytes).expect("Presentation should be a PDF");
    assert_eq!(pdf.get_pages().len(), 2);

    let questions = lesson_dir.join("Questions Videos");
    assert_eq!(fs::read(questions.join("Quiz.mp4")).unwrap(), b"QUESTION-1");
    assert_eq!(fs::read(questions.join("Quiz (0).mp4")).unwrap(), b"QUESTION-2");
    assert_eq!(fs::read_dir(&questions).unwrap().count(), 2);

    assert_eq!(
        context.manager.get_stats(),
        DownloadStats {
            lessons: 1,
            saved: 3,
            skipped: 0,
            unavailable: 0,
            failed: 0,
            dropped_duplicates: 0,
        }
    );

    // --- 第二次运行: 所有输出都已存在 ---
    let before = fs::read(lesson_dir.join("Lesson Video/Video.mp4")).unwrap();
    let context = context_for(&server.url(), output.path(), &[]);
    run_job(&context).await.expect("second run should succeed");

    assert_eq!(context.manager.get_stats().skipped, 3);
    assert_eq!(fs::read(lesson_dir.join("Lesson Video/Video.mp4")).unwrap(), before);
    assert_eq!(fs::read(lesson_dir.join("Presentation")).unwrap(), pdf_bytes);

    // 资源只在第一次运行时被请求；课时页面在第二次运行时也不再请求
    for mock in &site.assets {
        mock.assert_async().await;
    }
    site.lesson.assert_async().await;
    site.grade.assert_async().await;
    site.course.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_existing_outputs_cause_zero_fetches() {
    let mut server = mockito::Server::new_async().await;
    let lesson_mock = server
        .mock("GET", "/lessons/1/")
        .with_status(200)
        .with_body(LESSON_PAGE)
        .expect(0)
        .create_async()
        .await;
    let any_other = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let output = tempdir().unwrap();
    let lesson_dir = output.path().join("Physics/Unit/Lesson");
    fs::create_dir_all(lesson_dir.join("Lesson Video")).unwrap();
    fs::create_dir_all(lesson_dir.join("Questions Videos")).unwrap();
    fs::write(lesson_dir.join("Lesson Video/Video.mp4"), b"old video").unwrap();
    fs::write(lesson_dir.join("Presentation"), b"old pdf").unwrap();
    fs::write(lesson_dir.join("Questions Videos/Quiz.mp4"), b"old quiz").unwrap();

    let context = context_for(&server.url(), output.path(), &[]);
    let downloader = CourseDownloader::new(context);
    let outcomes = downloader
        .process_lesson("Lesson", &format!("{}/lessons/1/", server.url()), &lesson_dir)
        .await;

    assert_eq!(
        outcomes,
        vec![
            (AssetKind::Presentation, AssetOutcome::Skipped),
            (AssetKind::Video, AssetOutcome::Skipped),
            (AssetKind::Playlist, AssetOutcome::Skipped),
        ]
    );
    assert_eq!(fs::read(lesson_dir.join("Lesson Video/Video.mp4")).unwrap(), b"old video");
    assert_eq!(fs::read(lesson_dir.join("Presentation")).unwrap(), b"old pdf");
    assert_eq!(fs::read(lesson_dir.join("Questions Videos/Quiz.mp4")).unwrap(), b"old quiz");
    lesson_mock.assert_async().await;
    any_other.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_or_interrupted_questions_dir_does_not_count_as_saved() {
    let mut server = mockito::Server::new_async().await;
    let lesson = page(&mut server, "/lessons/1/", LESSON_PAGE).await;
    let playlist = page(&mut server, "/playlists/1/", PLAYLIST_PAGE).await;
    let _q1 = page(&mut server, "/videos/q1/", &player_page("/media/q1.mp4")).await;
    let _q2 = page(&mut server, "/videos/q2/", &player_page("/media/q2.mp4")).await;
    let _q3 = page(&mut server, "/videos/q3/", "<html></html>").await;
    let _q1_media = page(&mut server, "/media/q1.mp4", "Q1").await;
    let _q2_media = page(&mut server, "/media/q2.mp4", "Q2").await;

    let output = tempdir().unwrap();
    let lesson_dir = output.path().join("Physics/Unit/Lesson");
    fs::create_dir_all(lesson_dir.join("Questions Videos")).unwrap();
    // 上次运行被 Ctrl+C 打断时留下的临时文件
    fs::write(lesson_dir.join("Questions Videos/.part-x1y2z3"), b"half").unwrap();

    // 只保留题目视频处理器
    let context = context_for(
        &server.url(),
        output.path(),
        &["--skip", "video", "--skip", "presentation"],
    );
    let outcomes = CourseDownloader::new(context)
        .process_lesson("Lesson", &format!("{}/lessons/1/", server.url()), &lesson_dir)
        .await;

    assert_eq!(outcomes, vec![(AssetKind::Playlist, AssetOutcome::Saved)]);
    assert_eq!(fs::read(lesson_dir.join("Questions Videos/Quiz (0).mp4")).unwrap(), b"Q2");
    lesson.assert_async().await;
    playlist.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lesson_without_asset_links_reports_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _lesson = page(
        &mut server,
        "/lessons/2/",
        r#"<div class="components"><ul><li><a href="/plans/2/">Lesson Plan</a></li></ul></div>"#,
    )
    .await;

    let output = tempdir().unwrap();
    let lesson_dir = output.path().join("Physics/Unit/Plan Only");
    let context = context_for(&server.url(), output.path(), &[]);
    let outcomes = CourseDownloader::new(context)
        .process_lesson("Plan Only", &format!("{}/lessons/2/", server.url()), &lesson_dir)
        .await;

    assert!(outcomes.iter().all(|(_, o)| *o == AssetOutcome::Unavailable));
    assert_eq!(outcomes.len(), 3);
    // 没有下载任何东西，因此也没有写入任何文件
    assert_eq!(fs::read_dir(&lesson_dir).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_course_is_skipped_without_touching_course_pages() {
    let mut server = mockito::Server::new_async().await;
    let grade = page(&mut server, "/grades/11/", GRADE_PAGE).await;
    let course = server
        .mock("GET", "/courses/physics/")
        .expect(0)
        .create_async()
        .await;

    let output = tempdir().unwrap();
    let mut context = context_for(&server.url(), output.path(), &[]);
    let mut config = (*context.config).clone();
    config.courses = vec!["Astronomy".to_string()];
    context.config = Arc::new(config);

    run_job(&context).await.expect("run should succeed");
    assert_eq!(context.manager.get_stats(), DownloadStats::default());
    grade.assert_async().await;
    course.assert_async().await;
}
