//! Embedded handlebars templates for the HTML reports

pub const STYLES: &str = r##"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: #f4f5f7;
    color: #24292f;
    line-height: 1.5;
}
.container { max-width: 1280px; margin: 0 auto; padding: 24px; }
pre { margin: 0; white-space: pre-wrap; word-break: break-word; font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', monospace; font-size: 13px; }
.header { padding: 20px 24px; border-radius: 8px; margin-bottom: 20px; color: #1f2328; }
.theme-yellow .header { background: linear-gradient(135deg, #ffe6a0 0%, #f4c430 100%); }
.theme-green .header { background: linear-gradient(135deg, #98e198 0%, #4caf50 100%); }
.theme-red .header { background: linear-gradient(135deg, #ffa0a0 0%, #dc3545 100%); color: #fff; }
.theme-grey .header { background: linear-gradient(135deg, #d0d0d0 0%, #a0a0a0 100%); }
.plan-name { font-size: 20px; }
.meta-info { font-size: 14px; opacity: 0.85; }
.panel { background: #fff; border-radius: 8px; padding: 16px 20px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0,0,0,0.08); }
.summary-stats { display: flex; gap: 16px; flex-wrap: wrap; }
.stat-item { flex: 1; min-width: 140px; padding: 12px; border-radius: 6px; text-align: center; background: #f6f8fa; }
.stat-number { display: block; font-size: 28px; font-weight: bold; }
.stat-label { font-size: 13px; text-transform: uppercase; letter-spacing: 0.04em; }
.stat-item.create .stat-number, .addition .after-value { color: #1a7f37; }
.stat-item.update .stat-number, .modification .after-value { color: #9a6700; }
.stat-item.delete .stat-number, .removal .before-value { color: #cf222e; }
.filters { display: flex; align-items: center; gap: 16px; flex-wrap: wrap; }
.filter-group { display: flex; gap: 12px; flex-wrap: wrap; }
.filter-divider { width: 1px; align-self: stretch; background: #d0d7de; }
.btn { border: 1px solid #d0d7de; background: #f6f8fa; border-radius: 6px; padding: 6px 12px; cursor: pointer; }
.resource-group { margin-bottom: 20px; }
.group-header { display: flex; justify-content: space-between; align-items: baseline; }
.group-header h3 { margin: 0 0 8px 0; }
.group-summary { color: #57606a; font-size: 13px; }
.resource-change { background: #fff; border-left: 4px solid #a0a0a0; border-radius: 6px; margin-bottom: 8px; box-shadow: 0 1px 2px rgba(0,0,0,0.06); }
.resource-change.create { border-left-color: rgb(152, 225, 152); }
.resource-change.update { border-left-color: rgb(255, 230, 160); }
.resource-change.delete { border-left-color: rgb(255, 160, 160); }
.resource-change.recreate { border-left-color: rgb(181, 174, 254); }
.resource-header { padding: 10px 14px; cursor: pointer; display: flex; gap: 10px; align-items: center; }
.resource-address { font-family: monospace; font-weight: 600; flex: 1; }
.action-icon { font-family: monospace; font-weight: bold; min-width: 28px; }
.resource-details { display: none; padding: 0 14px 12px 14px; }
.resource-change.expanded .resource-details { display: block; }
.resource-change.expanded .toggle-indicator { transform: rotate(180deg); }
.properties-table { width: 100%; border-collapse: collapse; table-layout: fixed; }
.properties-table th, .properties-table td { text-align: left; vertical-align: top; padding: 6px 8px; border-bottom: 1px solid #eaeef2; }
.properties-table th:first-child { width: 25%; }
.property-name { font-family: monospace; word-break: break-all; }
.value-long-simple pre, .value-complex pre { max-height: 240px; overflow: auto; background: #f6f8fa; padding: 6px; border-radius: 4px; }
.property-change.hidden-by-filter { display: none; }
.sensitive, .computed { font-style: italic; color: #8250df; }
.dependency-indicator { cursor: help; }
.no-changes { text-align: center; }
.no-changes-icon { font-size: 48px; }
.command { font-family: monospace; background: #24292f; color: #f6f8fa; display: inline-block; padding: 6px 12px; border-radius: 4px; }
.output-item { display: flex; gap: 16px; padding: 8px 0; border-bottom: 1px solid #eaeef2; }
.output-name { font-family: monospace; font-weight: 600; min-width: 200px; }
.diagnostic { border-left: 4px solid #cf222e; padding: 8px 12px; margin-bottom: 8px; background: #fff5f5; }
.diagnostic.warning { border-left-color: #d4a72c; background: #fffbeb; }
.diagnostic-message { font-weight: 600; }
.diagnostic-meta { font-size: 12px; color: #57606a; }
.terminal-output { background: #1e1e1e; color: #d4d4d4; padding: 12px; border-radius: 6px; max-height: 480px; overflow: auto; }
.status-completed { color: #1a7f37; }
.status-failed { color: #cf222e; }
.status-in_progress { color: #9a6700; }
.footer { text-align: center; color: #57606a; font-size: 13px; padding: 16px 0; }
"##;

pub const FOOTER: &str = r##"
<div class="footer">
    Generated by planlens v{{version}} on {{generated_at}}
    {{#if build_url}} &bull; <a href="{{build_url}}" target="_blank" rel="noopener">View build</a>{{/if}}
</div>
"##;

pub const PLAN_SCRIPT: &str = r##"
function toggleResource(header) {
    header.parentElement.classList.toggle('expanded');
}

function applyPropertyFilters() {
    const hidden = Array.from(document.querySelectorAll('#property-filters input:checked')).map(i => i.value);
    document.querySelectorAll('.property-change').forEach(row => {
        row.classList.toggle('hidden-by-filter', hidden.includes(row.dataset.property));
    });
}

document.addEventListener('DOMContentLoaded', () => {
    document.querySelectorAll('#property-filters input').forEach(input => {
        input.addEventListener('change', applyPropertyFilters);
    });
    applyPropertyFilters();

    const toggle = document.getElementById('toggle-all');
    if (toggle) {
        toggle.addEventListener('click', () => {
            const resources = document.querySelectorAll('.resource-change');
            const expand = Array.from(resources).some(r => !r.classList.contains('expanded'));
            resources.forEach(r => r.classList.toggle('expanded', expand));
            toggle.textContent = expand ? 'Collapse All' : 'Expand All';
        });
    }
});
"##;

pub const PLAN_REPORT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Plan Report - {{title}}</title>
    <style>{{> styles}}</style>
</head>
<body class="{{theme}}">
<div class="container">
    <div class="header">
        <div class="plan-name"><strong>{{status_message}}</strong></div>
        <div class="meta-info">
            <strong>Plan:</strong> {{title}} &bull;
            <strong>Terraform Version:</strong> {{terraform_version}} &bull;
            <strong>Generated:</strong> {{generated_at}}
            {{#if plan_timestamp}} &bull; <strong>Planned:</strong> {{plan_timestamp}}{{/if}}
        </div>
    </div>

{{#if has_changes}}
    <div class="panel summary">
        <div class="summary-stats">
            <div class="stat-item create"><span class="stat-number">{{summary.create}}</span><span class="stat-label">to create</span></div>
            <div class="stat-item update"><span class="stat-number">{{summary.update}}</span><span class="stat-label">to update</span></div>
            <div class="stat-item delete"><span class="stat-number">{{summary.delete}}</span><span class="stat-label">to delete</span></div>
        </div>
    </div>

    <div class="panel filters">
        <div class="filter-section">
            <h3>Hide Properties</h3>
            <div class="filter-group" id="property-filters">
            {{#each filters}}
                <label class="filter-checkbox"><input type="checkbox" value="{{name}}"{{#if hidden}} checked{{/if}}> {{name}}</label>
            {{/each}}
            </div>
        </div>
        <div class="filter-divider"></div>
        <div class="control-section">
            <button id="toggle-all" class="btn toggle-btn">{{#if expand_all}}Collapse All{{else}}Expand All{{/if}}</button>
        </div>
    </div>

    <div class="resource-groups" id="resource-groups">
    {{#each groups}}
        <div class="resource-group" data-resource-type="{{resource_type}}">
            <div class="group-header">
                <h3>{{resource_type}} ({{count}} resources)</h3>
                <span class="group-summary">{{counts}}</span>
            </div>
            <div class="group-resources">
            {{#each changes}}
                <div class="resource-change {{action}}{{#if @root.expand_all}} expanded{{/if}}" data-action="{{action}}" data-address="{{address}}">
                    <div class="resource-header" onclick="toggleResource(this)">
                        <span class="action-icon">{{symbol}}</span>
                        <span class="resource-address">{{address}}</span>
                        {{#if dependency_reason}}<span class="dependency-indicator" title="{{dependency_reason}}">&#128161;</span>{{/if}}
                        <span class="toggle-indicator">&#9660;</span>
                    </div>
                    <div class="resource-details">
                    {{#if properties}}
                        <div class="property-changes">
                            <table class="properties-table">
                                <thead><tr><th>Property</th><th>Before</th><th>After</th></tr></thead>
                                <tbody>
                                {{#each properties}}
                                    <tr class="property-change {{kind}}" data-property="{{base_property}}">
                                        <td class="property-name">{{path}}</td>
                                        <td class="before-value value-{{before.mode}}{{#if sensitive}} sensitive{{/if}}"><pre>{{{before.text}}}</pre></td>
                                        <td class="after-value value-{{after.mode}}{{#if sensitive}} sensitive{{/if}}{{#if computed}} computed{{/if}}"><pre>{{{after.text}}}</pre></td>
                                    </tr>
                                {{/each}}
                                </tbody>
                            </table>
                        </div>
                    {{else}}
                        <p>No detailed changes available.</p>
                    {{/if}}
                    </div>
                </div>
            {{/each}}
            </div>
        </div>
    {{/each}}
    </div>
{{else}}
    <div class="panel summary no-changes">
        <div class="no-changes-icon">&#9989;</div>
        <h2>No Changes Required</h2>
        <p>Your infrastructure matches the configuration.</p>
        <p><strong>{{total_resources}}</strong> resources are already in the desired state</p>
        <div class="command-box">
            <h4>Next Steps</h4>
            <p>Your infrastructure is up-to-date. You can apply this plan to confirm, or make new infrastructure changes.</p>
            <div class="command">$ terraform apply</div>
        </div>
    </div>
{{/if}}

{{#if outputs}}
    <div class="panel outputs-section">
        <h2>Outputs</h2>
        <div class="outputs-container">
        {{#each outputs}}
            <div class="output-item" data-action="{{action}}">
                <div class="output-name">{{name}}</div>
                <div class="output-details value-{{value.mode}}">
                {{#if sensitive}}<span class="sensitive">(sensitive value)</span>{{else}}{{#if computed}}<span class="computed">(known after apply)</span>{{else}}<pre class="output-value">{{{value.text}}}</pre>{{/if}}{{/if}}
                </div>
            </div>
        {{/each}}
        </div>
    </div>
{{/if}}

{{> footer}}
</div>
<script>
    const planData = {{{plan_data}}};
    {{> plan_script}}
</script>
</body>
</html>
"##;

pub const ERROR_REPORT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Plan Error Report - {{title}}</title>
    <style>{{> styles}}</style>
</head>
<body class="theme-red">
<div class="container">
    <div class="header">
        <div class="plan-name"><strong>Terraform: plan failed</strong></div>
        <div class="meta-info"><strong>Error Report:</strong> {{title}} &bull; <strong>Generated:</strong> {{generated_at}}</div>
    </div>

{{#if errors}}
    <div class="panel">
        <h2>Errors ({{error_count}})</h2>
        {{#each errors}}
        <div class="diagnostic error">
            <div class="diagnostic-message">{{message}}</div>
            {{#if detail}}<pre class="diagnostic-detail">{{detail}}</pre>{{/if}}
        </div>
        {{/each}}
    </div>
{{/if}}

{{#if warnings}}
    <div class="panel">
        <h2>Warnings ({{warning_count}})</h2>
        {{#each warnings}}
        <div class="diagnostic warning">
            <div class="diagnostic-message">{{message}}</div>
            {{#if detail}}<pre class="diagnostic-detail">{{detail}}</pre>{{/if}}
        </div>
        {{/each}}
    </div>
{{/if}}

{{#if raw_output}}
    <div class="panel">
        <h2>Terminal Output</h2>
        <pre id="terminal-output" class="terminal-output">{{raw_output}}</pre>
    </div>
{{/if}}

{{> footer}}
</div>
</body>
</html>
"##;

pub const APPLY_REPORT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Apply Report - {{title}}</title>
    <style>{{> styles}}</style>
</head>
<body class="{{theme}}">
<div class="container">
    <div class="header">
        <div class="plan-name"><strong>{{outcome_label}}</strong></div>
        <div class="meta-info">
            <strong>Apply:</strong> {{title}} &bull;
            <strong>Exit code:</strong> {{exit_code}} &bull;
            {{#if terraform_version}}<strong>Version:</strong> {{terraform_version}} &bull;{{/if}}
            <strong>Generated:</strong> {{generated_at}}
        </div>
    </div>

    <div class="panel summary">
        <div class="summary-stats">
            <div class="stat-item create"><span class="stat-number">{{statistics.created}}</span><span class="stat-label">created</span></div>
            <div class="stat-item update"><span class="stat-number">{{statistics.modified}}</span><span class="stat-label">modified</span></div>
            <div class="stat-item delete"><span class="stat-number">{{statistics.destroyed}}</span><span class="stat-label">destroyed</span></div>
            <div class="stat-item"><span class="stat-number">{{statistics.failed_operations}}</span><span class="stat-label">failed</span></div>
        </div>
        {{#if total_duration}}<p>Total resource time: <strong>{{total_duration}}</strong></p>{{/if}}
    </div>

{{#if errors}}
    <div class="panel">
        <h2>Errors ({{error_count}})</h2>
        {{#each errors}}
        <div class="diagnostic error">
            <div class="diagnostic-message">{{message}}</div>
            <div class="diagnostic-meta">line {{line_number}}{{#if resource_address}} &bull; {{resource_address}}{{/if}}</div>
        </div>
        {{/each}}
    </div>
{{/if}}

{{#if warnings}}
    <div class="panel">
        <h2>Warnings ({{warning_count}})</h2>
        {{#each warnings}}
        <div class="diagnostic warning">
            <div class="diagnostic-message">{{message}}</div>
            <div class="diagnostic-meta">line {{line_number}}</div>
        </div>
        {{/each}}
    </div>
{{/if}}

{{#if operations}}
    <div class="panel">
        <h2>Resource Operations</h2>
        <table class="properties-table">
            <thead><tr><th>Resource</th><th>Type</th><th>Action</th><th>Status</th><th>Duration</th></tr></thead>
            <tbody>
            {{#each operations}}
                <tr class="operation">
                    <td class="property-name">{{address}}</td>
                    <td>{{resource_type}}</td>
                    <td>{{action}}</td>
                    <td class="status-{{status}}">{{status}}</td>
                    <td>{{duration}}</td>
                </tr>
            {{/each}}
            </tbody>
        </table>
    </div>
{{/if}}

{{#if log}}
    <div class="panel">
        <h2>Terminal Output</h2>
        <pre id="terminal-output" class="terminal-output">{{log}}</pre>
    </div>
{{/if}}

{{> footer}}
</div>
</body>
</html>
"##;
