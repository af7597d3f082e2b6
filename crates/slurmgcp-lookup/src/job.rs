//! Scheduler job records.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;

use slurmgcp_hostlist::{HostlistResult, expand};

use crate::error::JobParseError;

static JOB_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\s)JobId=(\d+)").expect("JobId pattern is valid"));
static JOB_STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\s)JobState=(\w+)").expect("JobState pattern is valid"));
static TIME_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|\s)TimeLimit=(\S*)").expect("TimeLimit pattern is valid")
});
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)-)?(\d+):(\d{2}):(\d{2})$").expect("duration pattern is valid")
});
static JOB_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\s)JobName=([^\r\n]*)").expect("JobName pattern is valid"));
static REQ_NODE_LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\s)ReqNodeList=([^\r\n]*)").expect("ReqNodeList pattern is valid"));

const TIME_LIMIT_UNLIMITED: &str = "UNLIMITED";

/// One job as described by `scontrol show job`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: u64,
    pub duration: Option<Duration>,
    pub name: Option<String>,
    pub job_state: String,
    /// Hostlist of nodes the job explicitly asked for.
    pub required_nodes: Option<String>,
}

impl Job {
    /// Expanded `required_nodes`, empty when the job requested none.
    pub fn required_node_names(&self) -> HostlistResult<Vec<String>> {
        match &self.required_nodes {
            Some(hostlist) => expand(hostlist),
            None => Ok(Vec::new()),
        }
    }
}

fn capture<'a>(re: &Regex, record: &'a str) -> Option<&'a str> {
    re.captures(record).and_then(|c| c.get(1)).map(|m| m.as_str())
}

// Line-valued fields run to end of line; "(null)" is how scontrol prints unset.
fn line_value(re: &Regex, record: &str) -> Option<String> {
    capture(re, record)
        .map(str::trim_end)
        .filter(|v| !v.is_empty() && *v != "(null)")
        .map(str::to_string)
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, JobParseError> {
    value.parse().map_err(|_| JobParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_time_limit(record: &str) -> Result<Option<Duration>, JobParseError> {
    let Some(value) = capture(&TIME_LIMIT_RE, record) else {
        return Ok(None);
    };
    if value == TIME_LIMIT_UNLIMITED {
        return Ok(None);
    }
    let invalid = || JobParseError::InvalidField {
        field: "TimeLimit",
        value: value.to_string(),
    };
    let caps = DURATION_RE.captures(value).ok_or_else(invalid)?;
    let part = |i: usize| caps.get(i).map_or("0", |m| m.as_str());
    let days: u64 = parse_number("TimeLimit", part(1))?;
    let hours: u64 = parse_number("TimeLimit", part(2))?;
    let minutes: u64 = parse_number("TimeLimit", part(3))?;
    let seconds: u64 = parse_number("TimeLimit", part(4))?;

    let total = days
        .checked_mul(24)
        .and_then(|h| h.checked_add(hours))
        .and_then(|h| h.checked_mul(3600))
        .and_then(|s| s.checked_add(minutes * 60 + seconds))
        .ok_or_else(invalid)?;
    Ok(Some(Duration::from_secs(total)))
}

/// Parse the key/value text of one job record.
///
/// `JobId` and `JobState` are required. A `TimeLimit` that is absent or
/// `UNLIMITED` leaves `duration` unset; any other value must be
/// `[D-]HH:MM:SS`.
pub fn parse_job_info(record: &str) -> Result<Job, JobParseError> {
    let id = capture(&JOB_ID_RE, record).ok_or(JobParseError::MissingField("JobId"))?;
    let id = parse_number("JobId", id)?;
    let job_state = capture(&JOB_STATE_RE, record)
        .ok_or(JobParseError::MissingField("JobState"))?
        .to_string();

    Ok(Job {
        id,
        duration: parse_time_limit(record)?,
        name: line_value(&JOB_NAME_RE, record),
        job_state,
        required_nodes: line_value(&REQ_NODE_LIST_RE, record),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: u64 = 3600;

    #[test]
    fn parses_full_record() {
        let record = "JobId=123
            TimeLimit=02:00:00
            JobName=myjob
            JobState=PENDING
            ReqNodeList=node-[1-10]";
        assert_eq!(
            parse_job_info(record).unwrap(),
            Job {
                id: 123,
                duration: Some(Duration::from_secs(2 * HOUR)),
                name: Some("myjob".to_string()),
                job_state: "PENDING".to_string(),
                required_nodes: Some("node-[1-10]".to_string()),
            }
        );
    }

    #[test]
    fn missing_time_limit_is_none() {
        let record = "JobId=456
            JobName=anotherjob
            JobState=PENDING
            ReqNodeList=node-group1";
        let job = parse_job_info(record).unwrap();
        assert_eq!(job.id, 456);
        assert_eq!(job.duration, None);
        assert_eq!(job.name.as_deref(), Some("anotherjob"));
        assert_eq!(job.required_nodes.as_deref(), Some("node-group1"));
    }

    #[test]
    fn minimal_record() {
        let record = "JobId=789
            TimeLimit=00:30:00
            JobState=COMPLETED";
        assert_eq!(
            parse_job_info(record).unwrap(),
            Job {
                id: 789,
                duration: Some(Duration::from_secs(30 * 60)),
                name: None,
                job_state: "COMPLETED".to_string(),
                required_nodes: None,
            }
        );
    }

    #[test]
    fn day_prefixed_limit_and_comma_node_list() {
        let record = "JobId=101112
            TimeLimit=1-00:30:00
            JobState=COMPLETED,
            ReqNodeList=node-[1-10],grob-pop-[2,1,44-77]";
        let job = parse_job_info(record).unwrap();
        assert_eq!(job.duration, Some(Duration::from_secs(24 * HOUR + 30 * 60)));
        assert_eq!(job.job_state, "COMPLETED");
        assert_eq!(job.name, None);
        assert_eq!(job.required_nodes.as_deref(), Some("node-[1-10],grob-pop-[2,1,44-77]"));
    }

    #[test]
    fn name_with_punctuation_runs_to_end_of_line() {
        let record = "JobId=131415
            TimeLimit=1-00:30:00
            JobName=mynode-1_maintenance
            JobState=COMPLETED,
            ReqNodeList=node-[1-10],grob-pop-[2,1,44-77]";
        let job = parse_job_info(record).unwrap();
        assert_eq!(job.id, 131415);
        assert_eq!(job.name.as_deref(), Some("mynode-1_maintenance"));
    }

    #[test]
    fn unlimited_and_null_fields() {
        let record = "JobId=7 JobState=RUNNING\nTimeLimit=UNLIMITED\nReqNodeList=(null)";
        let job = parse_job_info(record).unwrap();
        assert_eq!(job.duration, None);
        assert_eq!(job.required_nodes, None);
        assert_eq!(job.job_state, "RUNNING");
    }

    #[test]
    fn malformed_time_limit_is_rejected() {
        for limit in ["garbage", "30:00", "1-2:3:4", ""] {
            let record = format!("JobId=7\nJobState=PENDING\nTimeLimit={limit}");
            assert_eq!(
                parse_job_info(&record),
                Err(JobParseError::InvalidField {
                    field: "TimeLimit",
                    value: limit.to_string(),
                }),
                "TimeLimit={limit}"
            );
        }
    }

    #[test]
    fn required_fields() {
        assert_eq!(
            parse_job_info("JobState=PENDING"),
            Err(JobParseError::MissingField("JobId"))
        );
        assert_eq!(parse_job_info("JobId=1"), Err(JobParseError::MissingField("JobState")));
        assert!(matches!(
            parse_job_info("JobId=99999999999999999999999 JobState=PENDING"),
            Err(JobParseError::InvalidField { field: "JobId", .. })
        ));
    }

    #[test]
    fn expands_required_nodes() {
        let job = parse_job_info("JobId=1\nJobState=PENDING\nReqNodeList=c-n-[1-3]").unwrap();
        assert_eq!(job.required_node_names().unwrap(), ["c-n-1", "c-n-2", "c-n-3"]);

        let job = parse_job_info("JobId=2\nJobState=PENDING").unwrap();
        assert!(job.required_node_names().unwrap().is_empty());
    }
}
