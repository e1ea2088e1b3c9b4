use super::{carry, carry_optional, overlay_fields, Normalize};
use crate::config::ImportConfig;
use crate::model::job::{Job, JobApplication};
use crate::model::raw::{RawJob, RawJobApplication};

impl Normalize for RawJob {
    type Canonical = Job;

    fn normalize(self, prior: Option<&Job>, _config: &ImportConfig) -> Option<Job> {
        Some(Job {
            id: self.id?,
            title: carry(self.title, prior, |p| &p.title).unwrap_or_default(),
            status: carry_optional(self.status, prior, |p| &p.status),
            job_type: carry_optional(self.job_type, prior, |p| &p.job_type),
            job_category: carry_optional(self.job_category, prior, |p| &p.job_category),
            location: carry_optional(self.location, prior, |p| &p.location),
            salary_range: carry_optional(self.salary_range, prior, |p| &p.salary_range),
            deadline: carry_optional(self.deadline, prior, |p| &p.deadline),
            organization_name: carry_optional(self.organization_name, prior, |p| {
                &p.organization_name
            }),
            organization_logo: carry_optional(self.organization_logo, prior, |p| {
                &p.organization_logo
            }),
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}

impl Normalize for RawJobApplication {
    type Canonical = JobApplication;

    fn normalize(
        self,
        prior: Option<&JobApplication>,
        _config: &ImportConfig,
    ) -> Option<JobApplication> {
        Some(JobApplication {
            id: self.id?,
            job_id: carry_optional(self.job_id, prior, |p| &p.job_id),
            account_id: carry_optional(self.account_id, prior, |p| &p.account_id),
            status: carry_optional(self.status, prior, |p| &p.status),
            fields: overlay_fields(prior.map(|p| &p.fields), self.fields),
        })
    }
}
