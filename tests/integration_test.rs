use async_trait::async_trait;
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use web_blast::infrastructure::Sleeper;
use web_blast::services::{format_record_line, HEADER_ROW};
use web_blast::{AppError, BatchProcessor, Config, QueryCtx, QueryFlow};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CGI_PATH: &str = "/blast/Blast.cgi";

/// 只记录等待时长，不真正等待
#[derive(Default)]
struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

fn test_config(server: &MockServer) -> Config {
    Config {
        base_url: format!("{}{}", server.uri(), CGI_PATH),
        accept_invalid_certs: false,
        request_timeout_secs: 10,
        ..Config::default()
    }
}

fn flow(config: &Config) -> (QueryFlow, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let flow = QueryFlow::with_sleeper(config, sleeper.clone()).unwrap();
    (flow, sleeper)
}

fn write_fasta(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn status_body(status: &str) -> String {
    format!("<!--\nQBlastInfoBegin\n\tStatus={}\nQBlastInfoEnd\n-->\n", status)
}

fn report_json() -> serde_json::Value {
    json!({
        "BlastOutput2": [{
            "report": {
                "program": "blastn",
                "results": {
                    "search": {
                        "query_id": "Query_1",
                        "query_len": 100,
                        "hits": [{
                            "num": 1,
                            "description": [{
                                "accession": "CP009072",
                                "title": "Escherichia coli ATCC 25922, complete genome",
                                "sciname": "Escherichia coli"
                            }],
                            "len": 5130767,
                            "hsps": [
                                {"num": 1, "bit_score": 50.0, "score": 40, "evalue": 3e-12, "identity": 35},
                                {"num": 2, "bit_score": 30.0, "score": 20, "evalue": 1e-40, "identity": 15}
                            ]
                        }]
                    }
                }
            }
        }]
    })
}

async fn mount_submit(server: &MockServer, rid: &str, rtoe: u64) {
    Mock::given(method("GET"))
        .and(path(CGI_PATH))
        .and(query_param("CMD", "Put"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<!--QBlastInfoBegin\n    RID = {}\n    RTOE = {}\nQBlastInfoEnd\n-->", rid, rtoe)),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, waiting_rounds: u64, final_status: &str) {
    if waiting_rounds > 0 {
        Mock::given(method("GET"))
            .and(path(CGI_PATH))
            .and(query_param("FORMAT_OBJECT", "SearchInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(status_body("WAITING")))
            .up_to_n_times(waiting_rounds)
            .with_priority(1)
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(CGI_PATH))
        .and(query_param("FORMAT_OBJECT", "SearchInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(status_body(final_status)))
        .with_priority(2)
        .mount(server)
        .await;
}

async fn mount_report(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(CGI_PATH))
        .and(query_param("CMD", "Get"))
        .and(query_param("FORMAT_TYPE", "JSON2_S"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_query_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CGI_PATH))
        .and(query_param("CMD", "Put"))
        .and(query_param("PROGRAM", "blastn"))
        .and(query_param("DATABASE", "nt"))
        .and(query_param("MEGABLAST", "on"))
        .and(query_param("QUERY", ">ecoli_fragment\nACGTACGTAC\nGGTTAACC\n"))
        .respond_with(ResponseTemplate::new(200).set_body_string("    RID = E2ERID01\n    RTOE = 20\n"))
        .expect(1)
        .mount(&server)
        .await;
    mount_status(&server, 2, "READY").await;
    mount_report(&server, report_json()).await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(dir.path(), "Ecoli_Frag.fasta", ">ecoli_fragment\nACGTACGTAC\nGGTTAACC\n");

    let config = test_config(&server);
    let (flow, sleeper) = flow(&config);
    let ctx = QueryCtx::new("megablast", "nt", vec![file]);

    let record = flow.run(&ctx).await.unwrap();

    assert_eq!(record.basename, "Ecoli_Frag");
    assert_eq!(record.sequence, "ACGTACGTACGGTTAACC");
    assert_eq!(record.max_score, 50.0);
    assert_eq!(record.total_score, 80.0);
    assert_eq!(record.query_cover, "60.0%");
    assert_eq!(record.percent_identity, "50.0%");
    assert_eq!(record.e_value, 3e-12);
    assert_eq!(record.accession_length, 5130767);

    // RTOE 一次，WAITING 两次各等待一个固定间隔
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(20), Duration::from_secs(5), Duration::from_secs(5)]
    );

    assert_eq!(
        format_record_line(&record),
        "Ecoli_Frag,\"Escherichia coli ATCC 25922, complete genome\",Escherichia coli,50,80,60.0%,3e-12,50.0%,5130767,CP009072,ACGTACGTACGGTTAACC\n"
    );
}

#[tokio::test]
async fn test_failed_status_stops_polling() {
    let server = MockServer::start().await;
    mount_submit(&server, "FAILRID", 0).await;
    mount_status(&server, 1, "FAILED").await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(dir.path(), "q.fa", ">q\nMKVLAAGIVG\n");

    let config = test_config(&server);
    let (flow, _sleeper) = flow(&config);
    let ctx = QueryCtx::new("blastp", "nr", vec![file]);

    let err = tokio_test::assert_err!(flow.run(&ctx).await);
    assert!(matches!(err, AppError::RemoteFailure { ref rid } if rid == "FAILRID"));
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_expired_and_unexpected_status() {
    for (status, code) in [("UNKNOWN", 3), ("SOMETHING_ELSE", 5)] {
        let server = MockServer::start().await;
        mount_submit(&server, "RID", 0).await;
        mount_status(&server, 0, status).await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_fasta(dir.path(), "q.fa", "ACGT\n");

        let config = test_config(&server);
        let (flow, _sleeper) = flow(&config);
        let err = flow
            .run(&QueryCtx::new("blastn", "nt", vec![file]))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), code, "status {}", status);
    }
}

#[tokio::test]
async fn test_ready_without_hits_is_no_hit_error() {
    let server = MockServer::start().await;
    mount_submit(&server, "EMPTYRID", 0).await;
    mount_status(&server, 0, "READY").await;
    mount_report(
        &server,
        json!({"BlastOutput2": [{"report": {"results": {"search": {"query_len": 50, "hits": []}}}}]}),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(dir.path(), "q.fa", ">q\nACGT\n");

    let config = test_config(&server);
    let (flow, _sleeper) = flow(&config);
    let err = flow
        .run(&QueryCtx::new("blastn", "nt", vec![file]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoHit { .. }));
}

#[tokio::test]
async fn test_submission_without_rid_is_submission_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("CMD", "Put"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Error: query empty</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(dir.path(), "q.fa", ">q\nACGT\n");

    let config = test_config(&server);
    let (flow, sleeper) = flow(&config);
    let err = flow
        .run(&QueryCtx::new("blastn", "nt", vec![file]))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Submission(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(sleeper.slept().is_empty());
}

#[tokio::test]
async fn test_submission_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(dir.path(), "q.fa", ">q\nACGT\n");

    let config = test_config(&server);
    let (flow, _sleeper) = flow(&config);
    let err = flow
        .run(&QueryCtx::new("blastn", "nt", vec![file]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Submission(ref msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_unreadable_query_file_is_io_error() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let (flow, _sleeper) = flow(&config);

    let err = flow
        .run(&QueryCtx::new("blastn", "nt", vec![PathBuf::from("/no/such/query.fasta")]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Io { .. }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_batch_writes_header_and_records() {
    let server = MockServer::start().await;
    mount_submit(&server, "BATCHRID", 0).await;
    mount_status(&server, 0, "READY").await;
    mount_report(&server, report_json()).await;

    let queries = tempfile::tempdir().unwrap();
    write_fasta(queries.path(), "alpha.fasta", ">alpha\nAAAA\n");
    write_fasta(queries.path(), "Beta.FNA", ">beta\nCCCC\n");
    write_fasta(queries.path(), "readme.txt", "not a sequence");
    let output = tempfile::tempdir().unwrap();
    let log_dir = tempfile::tempdir().unwrap();
    let log_file = log_dir.path().join("blast_run.log");

    let config = Config {
        query_folder: queries.path().to_string_lossy().into_owned(),
        output_folder: output.path().to_string_lossy().into_owned(),
        output_log_file: log_file.to_string_lossy().into_owned(),
        batch_program: "blastn".to_string(),
        batch_database: "nt".to_string(),
        inter_query_delay_secs: 10,
        ..test_config(&server)
    };
    let (flow, sleeper) = flow(&config);

    let outcome = BatchProcessor::new(config, flow).run().await.unwrap();

    assert_eq!(outcome.stats.total, 2);
    assert_eq!(outcome.stats.success, 2);
    assert_eq!(outcome.stats.failed, 0);

    let output_file = outcome.output_file.unwrap();
    let name = output_file.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("blast_results_") && name.ends_with(".csv"));

    let content = std::fs::read_to_string(&output_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER_ROW);
    // 按文件名字节序排序
    assert!(lines[1].starts_with("Beta,"));
    assert!(lines[2].starts_with("alpha,"));

    // 两个文件之间只等待一次
    let delays = sleeper
        .slept()
        .into_iter()
        .filter(|d| *d == Duration::from_secs(10))
        .count();
    assert_eq!(delays, 1);

    // 运行日志包含每条查询的结果和最终统计
    let log = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(log.matches("✅").count(), 3);
    assert!(log.contains("成功: 2/2"));
    assert!(log.contains("失败: 0"));
    assert!(log.contains(&output_file.display().to_string()));
}

#[tokio::test]
async fn test_batch_with_empty_folder_writes_nothing() {
    let server = MockServer::start().await;
    let queries = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let config = Config {
        query_folder: queries.path().to_string_lossy().into_owned(),
        output_folder: output.path().to_string_lossy().into_owned(),
        ..test_config(&server)
    };
    let (flow, _sleeper) = flow(&config);

    let outcome = BatchProcessor::new(config, flow).run().await.unwrap();
    assert!(outcome.output_file.is_none());
    assert_eq!(outcome.stats.total, 0);
    assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
}

#[tokio::test]
#[ignore] // 访问真实 NCBI 服务，需要手动运行：cargo test -- --ignored
async fn test_live_ncbi_search() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_fasta(
        dir.path(),
        "lambda.fasta",
        ">lambda\nGGGCGGCGACCTCGCGGGTTTTCGCTATTTATGAAAATTTTCCGGTTTAAGGCGTTTCCGTTCTTCTTCGTC\n",
    );

    let config = Config::from_env();
    let flow = QueryFlow::new(&config).expect("创建客户端失败");
    let record = flow
        .run(&QueryCtx::new("megablast", "nt", vec![file]))
        .await
        .expect("查询失败");

    assert_eq!(record.basename, "lambda");
    assert!(record.max_score > 0.0);
}
